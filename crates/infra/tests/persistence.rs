//! File-backed persistence scenarios (process-restart simulation via fresh stores).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use satchel_core::{AggregateRoot, InventoryName, ItemDefinition, ItemId, Quantity};
use satchel_infra::{
    FileStore, InventoryRepository, InventorySession, KeyedStore, LoadOutcome, PersistenceError,
    StoreConfig, StoreError,
};
use satchel_inventory::{Inventory, NewStackPolicy};

fn sword() -> ItemDefinition {
    ItemDefinition::new(ItemId::new(), "Sword", 120, "A trusty blade.", "icons/sword.png")
}

fn potion() -> ItemDefinition {
    ItemDefinition::new(ItemId::new(), "Potion", 15, "Restores health.", "icons/potion.png")
}

#[test]
fn saved_bag_survives_a_fresh_store_instance() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let sword = sword();

    let mut bag = Inventory::new(InventoryName::new("Bag")?);
    bag.add(sword.item_id(), Quantity::new(2)?);
    InventoryRepository::new(FileStore::new(dir.path())).save(&bag)?;

    // A new store on the same directory stands in for a restarted process.
    let repo = InventoryRepository::new(FileStore::new(dir.path()));
    let mut restored = Inventory::new(InventoryName::new("Bag")?);
    let fired = Arc::new(AtomicUsize::new(0));
    let f = fired.clone();
    restored.subscribe(move || {
        f.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(repo.load(&mut restored)?, LoadOutcome::Restored { stacks: 1 });
    assert_eq!(restored.count_of(sword.item_id()), Some(2));
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn round_trip_reproduces_multiset_and_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = InventoryRepository::new(FileStore::new(dir.path()));
    let (sword, potion) = (sword(), potion());
    let shield = ItemId::new();

    let mut bag = Inventory::new(InventoryName::new("Hero Bag")?);
    bag.add(potion.item_id(), Quantity::new(5)?);
    bag.add(shield, Quantity::ONE);
    bag.add(sword.item_id(), Quantity::new(2)?);
    bag.remove(shield, Quantity::ONE);
    bag.add(potion.item_id(), Quantity::ONE);
    repo.save(&bag)?;

    let restored = repo.load_new(InventoryName::new("Hero Bag")?, NewStackPolicy::default())?;

    let mut before: Vec<_> = bag.entries().collect();
    let mut after: Vec<_> = restored.entries().collect();
    assert_eq!(after, before, "order is preserved by the JSON array format");
    before.sort();
    after.sort();
    assert_eq!(after, before);
    Ok(())
}

#[test]
fn loading_an_unknown_name_yields_empty_inventory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = InventoryRepository::new(FileStore::new(dir.path().join("not-created-yet")));

    let mut bag = Inventory::new(InventoryName::new("Bag")?);
    bag.add(ItemId::new(), Quantity::ONE);
    assert_eq!(repo.load(&mut bag)?, LoadOutcome::Empty);
    assert!(bag.is_empty());
    assert!(repo.store().keys()?.is_empty());
    Ok(())
}

#[test]
fn truncated_file_is_reported_as_corrupt() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path());
    let repo = InventoryRepository::new(store.clone());

    let mut bag = Inventory::new(InventoryName::new("Bag")?);
    bag.add(ItemId::new(), Quantity::new(3)?);
    repo.save(&bag)?;

    let key = bag.name().storage_key();
    let blob = store.read(&key)?.expect("record was just written");
    std::fs::write(
        dir.path().join(format!("{key}.json")),
        &blob[..blob.len() / 2],
    )?;

    let before: Vec<_> = bag.entries().collect();
    let err = repo.load(&mut bag).unwrap_err();
    assert!(matches!(err, PersistenceError::Corrupt { .. }), "got {err:?}");
    assert_eq!(bag.entries().collect::<Vec<_>>(), before);
    Ok(())
}

#[test]
fn records_are_one_json_file_per_inventory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = InventoryRepository::new(FileStore::new(dir.path()));

    for name in ["bag", "chest", "bank vault"] {
        let mut inventory = Inventory::new(InventoryName::new(name)?);
        inventory.add(ItemId::new(), Quantity::ONE);
        repo.save(&inventory)?;
    }

    assert_eq!(
        repo.store().keys()?,
        vec!["inventory.bag", "inventory.bank%20vault", "inventory.chest"]
    );

    let raw = std::fs::read_to_string(dir.path().join("inventory.chest.json"))?;
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(json["format"], 1);
    assert_eq!(json["name"], "chest");
    assert_eq!(json["items"][0]["count"], 1);
    Ok(())
}

#[test]
fn session_from_config_persists_across_reopen() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = StoreConfig::default().with_data_dir(dir.path());
    let potion = potion();

    let mut session = InventorySession::open(
        InventoryRepository::new(config.open_store()),
        InventoryName::new("Satchel")?,
        config.new_stack_policy,
    )?;
    session.add(potion.item_id(), Quantity::new(4)?);
    session.remove(potion.item_id(), Quantity::ONE);
    session.close()?;

    let session = InventorySession::open(
        InventoryRepository::new(config.open_store()),
        InventoryName::new("Satchel")?,
        config.new_stack_policy,
    )?;
    assert_eq!(session.inventory().count_of(potion.item_id()), Some(3));
    Ok(())
}

#[test]
fn non_utf8_record_is_corrupt_and_leaves_state_untouched() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let repo = InventoryRepository::new(FileStore::new(dir.path()));
    let sword = sword();

    let mut bag = Inventory::new(InventoryName::new("bag")?);
    bag.add(&sword, Quantity::new(2)?);
    std::fs::write(
        dir.path().join(format!("{}.json", bag.name().storage_key())),
        [0xff, 0xfe, 0x00],
    )?;
    let version = bag.version();

    let err = repo.load(&mut bag).unwrap_err();

    assert!(matches!(err, PersistenceError::Corrupt { .. }), "got {err:?}");
    assert_eq!(bag.entries().collect::<Vec<_>>(), vec![(sword.item_id(), 2)]);
    assert_eq!(bag.version(), version);
    Ok(())
}

#[test]
fn store_failures_surface_as_io_errors_without_touching_state() -> Result<()> {
    let dir = tempfile::tempdir()?;
    // A regular file where the store expects its root directory.
    let not_a_dir = dir.path().join("occupied");
    std::fs::write(&not_a_dir, "x")?;
    let repo = InventoryRepository::new(FileStore::new(&not_a_dir));
    let potion = potion();

    let mut bag = Inventory::new(InventoryName::new("Bag")?);
    bag.add(&potion, Quantity::new(3)?);
    let version = bag.version();

    let err = repo.save(&bag).unwrap_err();
    assert!(
        matches!(err, PersistenceError::Store(StoreError::Io { .. })),
        "got {err:?}"
    );

    let err = repo.load(&mut bag).unwrap_err();
    assert!(
        matches!(err, PersistenceError::Store(StoreError::Io { .. })),
        "got {err:?}"
    );
    assert_eq!(bag.entries().collect::<Vec<_>>(), vec![(potion.item_id(), 3)]);
    assert_eq!(bag.version(), version);
    Ok(())
}
