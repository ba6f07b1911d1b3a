pub(crate) mod connection;
pub(crate) mod push;
pub(crate) mod schema;
