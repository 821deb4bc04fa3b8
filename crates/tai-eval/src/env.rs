//! Run-wide environment: variables, struct definitions and open files.
//!
//! TaiScript has no lexical scoping. Loop and conditional bodies share the
//! single environment of the run.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

#[derive(Debug, Default)]
pub struct Environment {
    variables: BTreeMap<String, Value>,
    structs: BTreeMap<String, Vec<String>>,
    files: BTreeMap<String, BufWriter<File>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Variables ────────────────────────────────────────────────────────

    /// Bind or rebind a variable.
    pub fn define(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> EvalResult<&Value> {
        self.variables
            .get(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    // ── Structs ──────────────────────────────────────────────────────────

    pub fn define_struct(&mut self, name: &str, fields: Vec<String>) {
        self.structs.insert(name.to_string(), fields);
    }

    pub fn struct_fields(&self, name: &str) -> EvalResult<&[String]> {
        self.structs
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| EvalError::UndefinedStruct(name.to_string()))
    }

    /// A new instance of `name` with every field empty.
    pub fn instantiate(&self, name: &str) -> EvalResult<Value> {
        let fields = self
            .struct_fields(name)?
            .iter()
            .map(|field| (field.clone(), Value::Empty))
            .collect();
        Ok(Value::Struct {
            type_name: name.to_string(),
            fields,
        })
    }

    // ── Files ────────────────────────────────────────────────────────────

    /// Create or truncate `path` and register it under `alias`.
    pub fn open_file(&mut self, alias: &str, path: &str) -> EvalResult<()> {
        if self.files.contains_key(alias) {
            return Err(EvalError::FileAliasInUse(alias.to_string()));
        }
        let file = File::create(path).map_err(|e| EvalError::io(path, &e))?;
        self.files.insert(alias.to_string(), BufWriter::new(file));
        Ok(())
    }

    pub fn write_file(&mut self, alias: &str, text: &str, newline: bool) -> EvalResult<()> {
        let writer = self
            .files
            .get_mut(alias)
            .ok_or_else(|| EvalError::FileNotOpen(alias.to_string()))?;
        let result = if newline {
            writeln!(writer, "{text}")
        } else {
            write!(writer, "{text}")
        };
        result.map_err(|e| EvalError::io(alias, &e))
    }

    /// Flush and close the file registered under `alias`.
    pub fn close_file(&mut self, alias: &str) -> EvalResult<()> {
        let mut writer = self
            .files
            .remove(alias)
            .ok_or_else(|| EvalError::FileNotOpen(alias.to_string()))?;
        writer.flush().map_err(|e| EvalError::io(alias, &e))
    }

    pub fn is_open(&self, alias: &str) -> bool {
        self.files.contains_key(alias)
    }

    /// Flush and close every file still open. The first failure is
    /// returned after all files have been attempted.
    pub fn close_all(&mut self) -> EvalResult<()> {
        let mut first_err = None;
        for (alias, mut writer) in std::mem::take(&mut self.files) {
            if let Err(e) = writer.flush() {
                first_err.get_or_insert(EvalError::io(alias, &e));
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_rebind() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));
        env.define("x", Value::Str("do".into()));
        assert_eq!(env.get("x").unwrap(), &Value::Str("do".into()));
        assert_eq!(
            env.get("y").unwrap_err(),
            EvalError::UndefinedVariable("y".into())
        );
    }

    #[test]
    fn test_instantiate_keeps_field_order() {
        let mut env = Environment::new();
        env.define_struct("Daftar", vec!["babu".into(), "chaprasi".into()]);
        let Value::Struct { fields, .. } = env.instantiate("Daftar").unwrap() else {
            panic!("expected struct");
        };
        let names: Vec<&str> = fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["babu", "chaprasi"]);
        assert_eq!(
            env.instantiate("Ghost").unwrap_err(),
            EvalError::UndefinedStruct("Ghost".into())
        );
    }

    #[test]
    fn test_file_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let path = path.to_str().unwrap();

        let mut env = Environment::new();
        env.open_file("f", path).unwrap();
        assert_eq!(
            env.open_file("f", path).unwrap_err(),
            EvalError::FileAliasInUse("f".into())
        );
        env.write_file("f", "ek", false).unwrap();
        env.write_file("f", "do", true).unwrap();
        env.close_file("f").unwrap();
        assert!(!env.is_open("f"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "ekdo\n");

        assert_eq!(
            env.write_file("f", "x", true).unwrap_err(),
            EvalError::FileNotOpen("f".into())
        );
        assert_eq!(
            env.close_file("f").unwrap_err(),
            EvalError::FileNotOpen("f".into())
        );
    }

    #[test]
    fn test_close_all_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("left-open.txt");
        let mut env = Environment::new();
        env.open_file("f", path.to_str().unwrap()).unwrap();
        env.write_file("f", "pending", true).unwrap();
        env.close_all().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "pending\n");
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nahi").join("out.txt");
        let mut env = Environment::new();
        let err = env.open_file("f", path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, EvalError::Io { .. }));
        assert!(!env.is_open("f"));
    }
}
