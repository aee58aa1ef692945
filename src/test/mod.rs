
mod combinators;
mod handler;
