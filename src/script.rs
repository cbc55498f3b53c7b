//! Writer for the object literals handed to the widget.
//!
//! The output is JSON except that function-valued options are written as raw
//! JavaScript expressions, so it can only be consumed as script.

use serde::Serialize;

pub struct ObjectWriter {
    buf: String,
    empty: bool,
}

impl Default for ObjectWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self {
            buf: String::from("{"),
            empty: true,
        }
    }

    fn key(&mut self, key: &str) -> serde_json::Result<()> {
        if !self.empty {
            self.buf.push(',');
        }
        self.empty = false;
        self.buf.push_str(&serde_json::to_string(key)?);
        self.buf.push(':');
        Ok(())
    }

    /// Writes `value` as JSON under `key`. `None` writes nothing.
    pub fn value<V>(&mut self, key: &str, value: Option<&V>) -> serde_json::Result<&mut Self>
    where
        V: Serialize + ?Sized,
    {
        if let Some(value) = value {
            let value = serde_json::to_string(value)?;
            self.key(key)?;
            self.buf.push_str(&value);
        }
        Ok(self)
    }

    /// Writes `body` unquoted under `key`. `None` writes nothing.
    pub fn function(&mut self, key: &str, body: Option<&str>) -> serde_json::Result<&mut Self> {
        if let Some(body) = body {
            self.raw(key, body)?;
        }
        Ok(self)
    }

    /// Writes an already rendered literal, e.g. a nested object, under `key`.
    pub fn raw(&mut self, key: &str, literal: &str) -> serde_json::Result<&mut Self> {
        self.key(key)?;
        self.buf.push_str(literal);
        Ok(self)
    }

    pub fn finish(mut self) -> String {
        self.buf.push('}');
        self.buf
    }
}
