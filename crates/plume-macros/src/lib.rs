//! Procedural macros for Plume plugins.
//!
//! This crate provides the handler declaration attributes:
//!
//! - `#[on_message(...)]` for `fn(&mut MessageSession<'_>) -> R`
//! - `#[on_notice(...)]` for `fn(&mut NoticeSession<'_>) -> R`
//! - `#[on_request(...)]` for `fn(&mut RequestSession<'_>) -> R`
//!
//! Declared handlers are collected at link time and applied by
//! `Registry::register_static`; nothing runs before the host asks for it.
//! Two declarations with the same name in one category overwrite each other
//! in link order, which is unspecified; `register_static` warns when it
//! happens. Give each declaration a distinct `name`.
//!
//! ```rust,ignore
//! use plume_framework::{cond, on_message, MessageSession};
//!
//! #[on_message(cond::group_message(), cond::startswith("!echo"))]
//! fn echo(session: &mut MessageSession<'_>) -> plume_core::ApiResult<()> {
//!     let text = session.plain_text();
//!     session.send(text.trim_start_matches("!echo").trim())?;
//!     Ok(())
//! }
//!
//! // Registered as "greeter" instead of "welcome"
//! #[on_notice(name = "greeter", cond::notice_type("group_increase"))]
//! fn welcome(session: &mut NoticeSession<'_>) {}
//! ```

mod handler;

use proc_macro::TokenStream;

use handler::Category;

fn expand(category: Category, attr: TokenStream, item: TokenStream) -> TokenStream {
    match handler::expand(category, attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// Declares a message handler.
#[proc_macro_attribute]
pub fn on_message(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Category::Message, attr, item)
}

/// Declares a notice handler.
#[proc_macro_attribute]
pub fn on_notice(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Category::Notice, attr, item)
}

/// Declares a request handler.
#[proc_macro_attribute]
pub fn on_request(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(Category::Request, attr, item)
}
