//! Terminal UI layer for interactive chat sessions.
//!
//! The UI module owns rendering, layout, keyboard handling, and loop control
//! for the text user interface.
//!
//! Key submodules include:
//! - [`chat_loop`]: the main interaction loop that feeds keys to the input box
//!   and hands submissions to [`crate::core::session::ChatSession`].
//! - [`renderer`] and [`transcript`]: view composition and frame output.
//! - [`markdown`]: the restricted markdown subset used for replies and memory.
//! - [`theme`]: color/style policy.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic and backend coordination.

pub mod chat_loop;
pub mod input;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod transcript;
