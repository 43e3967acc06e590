// src/buffer/mod.rs
//! The [`Buffer`] type and its operation families
//!
//! The struct and its cursor/seek/capacity plumbing live in `core`; the
//! operation families are split by concern: `binary` (typed scalars, raw
//! bytes, records), `text` (formatting, scanning, indentation), `strings`
//! (terminated, delimited and tokenized strings) and `lines` (line reads
//! and CRLF normalization). All of them are `impl Buffer` blocks, so the
//! split is invisible to callers.

pub mod core;

mod binary;
mod lines;
mod strings;
mod text;

pub use self::core::{Buffer, BufferMode, BufferOptions, SeekType};
