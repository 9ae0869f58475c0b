//! Router, layout chrome, form panel and bootstrap
//!
//! ## Example
//!
//! ```rust,ignore
//! use gestor::prelude::*;
//!
//! async fn clients(ctx: PageContext) -> Result<(), PageError> {
//!     let id = ctx.param("id").unwrap_or_default();
//!     ctx.container.set_content(html::h2().text(format!("Cliente {}", id)))?;
//!     Ok(())
//! }
//!
//! let routes = vec![
//!     Route::new("/clientes/:id", clients).title("Cliente").requires_auth(),
//! ];
//! gestor::pages::launch(ShellSettings::default(), Rc::new(MyProvider::new()), routes);
//! ```

// Re-export all gestor-pages functionality
pub use gestor_pages::*;
