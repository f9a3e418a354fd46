// Authentication: bearer token verification

pub mod jwt;
