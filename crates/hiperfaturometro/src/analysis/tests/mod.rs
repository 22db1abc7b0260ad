mod common;
mod properties;
mod service;
