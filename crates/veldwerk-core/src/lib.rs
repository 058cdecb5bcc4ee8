pub mod config;
pub mod error;
pub mod fieldvisits;
pub mod flagger;
pub mod geocode;
pub mod localtime;
pub mod observations;
pub mod outputs;
pub mod protocol;
pub mod solar;
pub mod suggest;
pub mod types;
