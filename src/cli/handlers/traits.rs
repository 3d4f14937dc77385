//! Handler construction traits
//!
//! Handlers either borrow the [`CliContext`] or need nothing at all; the
//! factories below let the router build both kinds the same way.

use crate::cli::CliContext;

/// Handlers that borrow the CLI context
pub trait HandlerFactory<'a> {
    type Handler;

    fn create(context: &'a CliContext) -> Self::Handler;
}

/// Handlers without dependencies
pub trait StatelessHandlerFactory {
    type Handler;

    fn create() -> Self::Handler;
}

/// Implements [`HandlerFactory`] for a handler with a `new(&CliContext)`
macro_rules! impl_context_handler {
    ($handler:ident) => {
        impl<'a> crate::cli::handlers::traits::HandlerFactory<'a> for $handler<'a> {
            type Handler = Self;

            fn create(context: &'a crate::cli::CliContext) -> Self::Handler {
                Self::new(context)
            }
        }
    };
}

/// Implements [`StatelessHandlerFactory`] for a handler with a `new()`
macro_rules! impl_stateless_handler {
    ($handler:ty) => {
        impl crate::cli::handlers::traits::StatelessHandlerFactory for $handler {
            type Handler = Self;

            fn create() -> Self::Handler {
                Self::new()
            }
        }
    };
}

pub(crate) use impl_context_handler;
pub(crate) use impl_stateless_handler;

/// Builds handlers for one command invocation
pub struct HandlerBuilder<'a> {
    context: &'a CliContext,
}

impl<'a> HandlerBuilder<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub fn create_with_context<F>(&self) -> F::Handler
    where
        F: HandlerFactory<'a>,
    {
        F::create(self.context)
    }

    pub fn create_stateless<F>() -> F::Handler
    where
        F: StatelessHandlerFactory,
    {
        F::create()
    }
}
