use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::Chars,
};

use anyhow::{Context, Result};

/// Word list keyed by uppercase letters. Lookups are case-insensitive.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Trie {
    // Most nodes have only a few children, so a Vec with linear search beats a map here
    next: Vec<(char, Box<Trie>)>,
    finish: bool,
}

impl Trie {
    pub fn new() -> Self {
        Trie {
            next: Vec::new(),
            finish: false,
        }
    }

    pub fn insert(&mut self, word: &str) {
        let word = word.trim();
        if word.is_empty() || !word.chars().all(|c| c.is_ascii_alphabetic()) {
            return;
        }
        self.insert_chars(&mut word.chars().map(|c| c.to_ascii_uppercase()));
    }

    fn insert_chars(&mut self, word: &mut impl Iterator<Item = char>) {
        match word.next() {
            None => self.finish = true,
            Some(c) => {
                if let Some(pos) = self.next.iter().position(|(ch, _)| *ch == c) {
                    self.next[pos].1.insert_chars(word);
                } else {
                    let mut trie = Trie::new();
                    trie.insert_chars(word);
                    self.next.push((c, Box::new(trie)));
                }
            }
        }
    }

    /// Node reached by following `c` from here.
    pub fn child(&self, c: char) -> Option<&Trie> {
        let c = c.to_ascii_uppercase();
        self.next.iter().find(|(ch, _)| *ch == c).map(|(_, child)| child.as_ref())
    }

    pub fn children(&self) -> impl Iterator<Item = (char, &Trie)> {
        self.next.iter().map(|(c, child)| (*c, child.as_ref()))
    }

    pub fn is_word(&self) -> bool {
        self.finish
    }

    fn walk(&self, word: &mut Chars) -> Option<&Trie> {
        match word.next() {
            Some(c) => self.child(c)?.walk(word),
            None => Some(self),
        }
    }

    pub fn search(&self, word: &str) -> bool {
        !word.is_empty() && self.walk(&mut word.chars()).is_some_and(Trie::is_word)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening word list {}", path.display()))?;
        let mut result = Trie::new();
        for line in BufReader::new(file).lines() {
            result.insert(&line.context("reading word list")?);
        }
        Ok(result)
    }
}

impl From<Vec<&str>> for Trie {
    fn from(words: Vec<&str>) -> Self {
        let mut result = Trie::new();
        for word in words {
            result.insert(word)
        }
        result
    }
}

impl From<String> for Trie {
    fn from(text: String) -> Self {
        let mut result = Trie::new();
        for word in text.lines() {
            result.insert(word);
        }
        result
    }
}
