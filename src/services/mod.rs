// src/services/mod.rs

pub mod bootstrap_service;
