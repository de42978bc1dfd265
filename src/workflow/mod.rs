pub mod connection;
pub mod ticket;

#[cfg(test)]
pub(crate) mod fakes;
