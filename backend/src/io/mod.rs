//! IO layer: the REST surface over the domain services.

pub mod rest;
