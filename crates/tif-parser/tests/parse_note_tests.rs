//! End-to-end tests for `NoteParser`

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tif_parser::{BlockKind, NoteParser, OutlineNode, ParserError, TaskStatus};

const NOTE: &str = r#"---
title: Test Note
tags: [rust, testing]
---

Intro line with #inline tag.

# Introduction

See [[Other Note#Setup|setup]] and [[#Introduction]].

## Tasks

- [ ] write parser
- [x] read docs
  - nested detail

```rust
let x = "[[not a link]] #not-a-tag";
```
"#;

fn heading<'a>(nodes: &'a [OutlineNode], text: &str) -> Option<&'a OutlineNode> {
    nodes
        .iter()
        .find(|n| matches!(n.kind, BlockKind::Heading { .. }) && n.text == text)
}

#[test]
fn test_parse_full_note() {
    let parser = NoteParser::new();
    let parsed = parser.parse_content(NOTE, Path::new("vault/Test.md")).unwrap();

    assert_eq!(parsed.stem(), "Test");

    let fm = parsed.frontmatter.as_ref().expect("frontmatter");
    assert_eq!(fm.fields[0].key, "title");
    assert_eq!(fm.fields[0].values, vec!["Test Note"]);

    // preamble paragraph + Introduction heading
    assert_eq!(parsed.outline.len(), 2);
    assert_eq!(parsed.outline[0].kind, BlockKind::Paragraph);
    assert_eq!(parsed.outline[0].text, "Intro line with #inline tag.");

    let intro = heading(&parsed.outline, "Introduction").expect("introduction heading");
    assert_eq!(
        intro.children[0].text,
        "See [[Other Note#Setup|setup]] and [[#Introduction]]."
    );

    let tasks = heading(&intro.children, "Tasks").expect("tasks heading nested under introduction");
    assert_eq!(tasks.children[0].kind, BlockKind::ListItem { task: Some(TaskStatus::Pending) });
    assert_eq!(tasks.children[1].kind, BlockKind::ListItem { task: Some(TaskStatus::Completed) });
    assert_eq!(tasks.children[1].children[0].text, "nested detail");

    let code = &tasks.children[2];
    assert_eq!(code.kind, BlockKind::CodeBlock { language: Some("rust".into()) });
    assert_eq!(code.text, r#"let x = "[[not a link]] #not-a-tag";"#);
}

#[test]
fn test_setext_heading_after_frontmatter() {
    let content = "---\ntitle: x\n---\nIntro\n=====\nbody\n";
    let parsed = NoteParser::new()
        .parse_content(content, Path::new("doc1.md"))
        .unwrap();

    let intro = heading(&parsed.outline, "Intro").expect("setext heading");
    assert_eq!(intro.line, 1);
    assert_eq!(intro.children[0].text, "body");
}

#[test]
fn test_parse_file_reads_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("note.md");
    fs::write(&path, "# Heading\nbody").unwrap();

    let parsed = NoteParser::new().parse_file(&path).unwrap();
    assert_eq!(parsed.outline.len(), 1);
    assert_eq!(parsed.outline[0].subtree_len(), 2);
}

#[test]
fn test_file_size_limit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("big.md");
    fs::write(&path, "x".repeat(64)).unwrap();

    let parser = NoteParser::new().with_max_file_size(Some(16));
    let err = parser.parse_file(&path).unwrap_err();
    assert!(matches!(err, ParserError::FileTooLarge { size: 64, max: 16 }));
}

#[test]
fn test_invalid_utf8_is_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("binary.md");
    fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

    let err = NoteParser::new().parse_file(&path).unwrap_err();
    assert!(matches!(err, ParserError::Encoding(_)));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = NoteParser::new()
        .parse_file(&dir.path().join("nope.md"))
        .unwrap_err();
    assert!(matches!(err, ParserError::Io(_)));
}
