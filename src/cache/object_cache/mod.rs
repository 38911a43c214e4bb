mod moka;
mod redis;

pub use self::moka::MokaKvStore;
pub use self::redis::RedisKvStore;
