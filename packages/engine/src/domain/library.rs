use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::{EngineError, EngineResult};

use super::pattern_file::read_pattern_file;
use super::patterns::{Pattern, BUILTIN_PATTERNS};

#[derive(Deserialize)]
struct BundleRoot {
    patterns: Vec<BundlePattern>,
}

#[derive(Deserialize)]
struct BundlePattern {
    name: String,
    cells: Vec<[u32; 2]>,
}

/// Named patterns; anything not registered is looked up on disk.
#[derive(Clone, Debug)]
pub struct PatternLibrary {
    patterns: HashMap<String, Pattern>,
}

impl Default for PatternLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternLibrary {
    /// Library holding the built-in patterns
    pub fn new() -> Self {
        let mut patterns = HashMap::new();
        for builtin in BUILTIN_PATTERNS {
            patterns.insert(builtin.name.to_string(), Pattern::from(builtin));
        }
        Self { patterns }
    }

    /// Built-ins plus every pattern of a JSON bundle:
    /// `{"patterns": [{"name": "...", "cells": [[row, col], ...]}]}`
    pub fn from_bundle_json(json: &str) -> EngineResult<Self> {
        let bundle: BundleRoot =
            serde_json::from_str(json).map_err(|e| EngineError::PatternBundle(e.to_string()))?;
        let mut library = Self::new();
        for entry in bundle.patterns {
            if entry.name.trim().is_empty() {
                return Err(EngineError::PatternBundle("pattern with empty name".to_string()));
            }
            let cells = entry.cells.into_iter().map(|[r, c]| (r, c)).collect();
            library.register(Pattern::new(entry.name, cells));
        }
        Ok(library)
    }

    /// Add or replace a pattern; names are case-insensitive
    pub fn register(&mut self, pattern: Pattern) {
        self.patterns.insert(pattern.name.to_ascii_lowercase(), pattern);
    }

    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.get(&name.to_ascii_lowercase())
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a registered name, falling back to a pattern file path
    pub fn load(&self, name_or_path: &str) -> EngineResult<Pattern> {
        if let Some(pattern) = self.get(name_or_path) {
            return Ok(pattern.clone());
        }
        let path = Path::new(name_or_path);
        if path.exists() {
            return read_pattern_file(path);
        }
        Err(EngineError::UnknownPattern(name_or_path.to_string()))
    }
}
