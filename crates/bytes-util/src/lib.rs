//! Bounds-checked byte cursors over borrowed buffers.
//!
//! Every multi-byte field read or written through these cursors is big-endian
//! ("network order"). Lengths are checked before a single byte is consumed, so
//! a failed read leaves the cursor exactly where it was.
//!
//! ## Example
//!
//! ```rust
//! # fn test() -> Result<(), flvprobe_bytes_util::CursorError> {
//! use flvprobe_bytes_util::{ByteCursor, ByteCursorMut};
//!
//! let mut buf = [0u8; 6];
//! let mut writer = ByteCursorMut::new(&mut buf);
//! writer.write_u16(0x0102)?;
//! writer.write_u32(0x03040506)?;
//!
//! let mut reader = ByteCursor::new(&buf);
//! assert_eq!(reader.read_u24()?, 0x010203);
//! assert_eq!(reader.remaining(), 3);
//! # Ok(())
//! # }
//! # test().expect("test failed");
//! ```
//!
//! ## License
//!
//! This project is licensed under the [MIT](./LICENSE.MIT) or [Apache-2.0](./LICENSE.Apache-2.0) license.
//! You can choose between one of them if you use this work.
//!
//! `SPDX-License-Identifier: MIT OR Apache-2.0`
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(unreachable_pub)]

mod cursor;
mod error;

pub use cursor::{ByteCursor, ByteCursorMut, SubCursor};
pub use error::CursorError;
