//! Maven repository plumbing: POM parsing with property resolution,
//! repository priority ordering, local package-cache lookup, remote POM
//! fetching with a failed-repository skip-set, and concurrent reachability
//! probing.

pub mod fetch;
pub mod local;
pub mod pom;
pub mod probe;
pub mod repository;
