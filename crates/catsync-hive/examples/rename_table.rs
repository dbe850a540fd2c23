//! Plans a table rename and prints the resulting notifications.
//!
//! Run with: `cargo run -p catsync-hive --example rename_table`

use std::sync::Arc;

use catsync_core::{LogFormat, init_logging};
use catsync_hive::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LogFormat::Pretty);

    let mut old = HiveTable::new("db1", "orders");
    old.columns = vec![HiveColumn::new("id", "bigint")];
    old.storage = Some(HiveStorage {
        location: Some("hdfs://nn/warehouse/db1.db/orders".to_string()),
        ..HiveStorage::default()
    });
    let mut new = old.clone();
    new.table_name = "orders_v2".to_string();

    let event = HookEvent {
        operation: HiveOperation::AlterTableRename,
        user: Some("alice".to_string()),
        inputs: vec![HookEntity::table(old.clone())],
        outputs: vec![HookEntity::table(old), HookEntity::table(new)],
    };

    let config = HookConfig::from_env()?;
    let cache = Arc::new(config.known_objects_cache());
    let hook = RenameHook::new(config, cache)?;

    for notification in hook.handle(&event)? {
        println!("{}", serde_json::to_string_pretty(&notification)?);
    }

    Ok(())
}
