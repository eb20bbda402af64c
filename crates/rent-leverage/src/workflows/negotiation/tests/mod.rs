mod common;
mod insights;
mod service;
