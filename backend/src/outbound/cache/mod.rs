//! Cache adapters implementing the `ProductCache` port.
//!
//! Two adapters are provided:
//!
//! - [`RedisProductCache`] stores JSON payloads in Redis through a `bb8-redis`
//!   pool, using namespaced keys (`product:v1:<uuid>`) and a TTL with jitter
//!   so entries written together do not expire together.
//! - [`InMemoryProductCache`] keeps entries in process memory for single
//!   instance deployments and tests.

mod in_memory;
mod redis;

pub use self::in_memory::InMemoryProductCache;
pub use self::redis::RedisProductCache;
