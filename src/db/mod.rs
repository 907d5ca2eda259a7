pub mod memory;
pub mod postgres;
pub mod repository;

pub use memory::MemoryStore;
pub use postgres::{create_pool, run_migrations, PgStore};
pub use repository::{
    EntityStore, FavoriteRepository, SessionRepository, UserRepository, WatchRepository,
};
