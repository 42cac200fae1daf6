//! Markup and stylesheet parsing plus style cascade resolution.
//!
//! ```
//! use cascada_core::{css, html, style};
//!
//! let document = html::parse("<p class=\"warn\">hi</p>").unwrap();
//! let rules = css::parse(".warn { color: red; }");
//! let styled = style::resolve(&document, &rules);
//! let root = &styled.roots()[0];
//! assert_eq!(root.value("color").map(|v| v.to_string()), Some("red".to_string()));
//! ```

pub mod cursor;
pub mod dom;
pub mod error;
pub mod html;
pub mod css;
pub mod observer;
pub mod style;

pub use error::{Error, Result};
