//! Schema migrations.
//!
//! Run once at start-up (see [`crate::db::open`]) before the repository is
//! handed to the router.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_portal_tables;
mod m20250301_000002_create_session_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Keep our bookkeeping table apart from anything else living in the same file
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("student_portal_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_portal_tables::Migration),
            Box::new(m20250301_000002_create_session_table::Migration),
        ]
    }
}
