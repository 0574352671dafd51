//! Request handlers run by the [`HttpConnection`](crate::connection::HttpConnection) once a
//! request is complete.
//!
//! A handler reads the parsed request from the [`Session`] and writes its answer through
//! [`Session::response_mut`]. Handlers run synchronously between two reads, so they must not
//! block.

use std::error::Error;

use crate::session::Session;

pub trait Handler {
    type Error: Into<Box<dyn Error + Send + Sync>>;

    fn call(&self, session: &mut Session) -> Result<(), Self::Error>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<Err, F> Handler for HandlerFn<F>
where
    F: Fn(&mut Session) -> Result<(), Err>,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    type Error = Err;

    fn call(&self, session: &mut Session) -> Result<(), Self::Error> {
        (self.f)(session)
    }
}

impl<H: Handler + ?Sized> Handler for std::sync::Arc<H> {
    type Error = H::Error;

    fn call(&self, session: &mut Session) -> Result<(), Self::Error> {
        (**self).call(session)
    }
}

/// Wraps a closure into a [`Handler`].
pub fn make_handler<F, Err>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut Session) -> Result<(), Err>,
    Err: Into<Box<dyn Error + Send + Sync>>,
{
    HandlerFn { f }
}
