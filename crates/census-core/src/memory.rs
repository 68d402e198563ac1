//! [`MemoryStore`]: an in-process implementation of both repository traits.
//!
//! Each table keeps rows keyed by id, an insertion-order index and a name
//! index used by the uniqueness checks in the services.

use std::{
  collections::{BTreeMap, BTreeSet, HashMap},
  sync::{Arc, RwLock},
};

use thiserror::Error;
use uuid::Uuid;

use crate::{
  country::Country,
  person::Person,
  repository::{CountriesRepository, PersonsRepository},
};

#[derive(Debug, Error)]
pub enum MemoryStoreError {
  #[error("memory store lock poisoned")]
  Poisoned,

  #[error("id {0} is already taken")]
  DuplicateId(Uuid),
}

type Result<T, E = MemoryStoreError> = std::result::Result<T, E>;

// ─── Table ───────────────────────────────────────────────────────────────────

trait Row: Clone {
  fn id(&self) -> Uuid;
  fn name(&self) -> &str;
}

impl Row for Country {
  fn id(&self) -> Uuid { self.country_id }

  fn name(&self) -> &str { &self.country_name }
}

impl Row for Person {
  fn id(&self) -> Uuid { self.person_id }

  fn name(&self) -> &str { &self.person_name }
}

struct Table<T> {
  next_seq: u64,
  rows:     HashMap<Uuid, (u64, T)>,
  order:    BTreeMap<u64, Uuid>,
  by_name:  HashMap<String, BTreeSet<u64>>,
}

impl<T> Default for Table<T> {
  fn default() -> Self {
    Self {
      next_seq: 0,
      rows:     HashMap::new(),
      order:    BTreeMap::new(),
      by_name:  HashMap::new(),
    }
  }
}

impl<T: Row> Table<T> {
  fn insert(&mut self, row: T) -> Result<T> {
    let id = row.id();
    if self.rows.contains_key(&id) {
      return Err(MemoryStoreError::DuplicateId(id));
    }
    let seq = self.next_seq;
    self.next_seq += 1;

    self.order.insert(seq, id);
    self.by_name.entry(row.name().to_owned()).or_default().insert(seq);
    self.rows.insert(id, (seq, row.clone()));
    Ok(row)
  }

  /// Insert `row` only if no stored row has the same name. Callers hold the
  /// write lock, so check and insert cannot interleave.
  fn insert_if_name_absent(&mut self, row: T) -> Result<Option<T>> {
    if self.by_name.contains_key(row.name()) {
      return Ok(None);
    }
    self.insert(row).map(Some)
  }

  fn get(&self, id: Uuid) -> Option<T> {
    self.rows.get(&id).map(|(_, row)| row.clone())
  }

  fn all(&self) -> Vec<T> {
    self
      .order
      .values()
      .filter_map(|id| self.rows.get(id))
      .map(|(_, row)| row.clone())
      .collect()
  }

  fn first_by_name(&self, name: &str) -> Option<T> {
    let seq = self.by_name.get(name)?.first()?;
    self.order.get(seq).and_then(|id| self.get(*id))
  }

  fn replace(&mut self, row: T) -> Option<T> {
    let (seq, old) = self.rows.get(&row.id())?;
    let seq = *seq;
    let old_name = old.name().to_owned();
    if old_name != row.name() {
      self.unindex_name(&old_name, seq);
      self.by_name.entry(row.name().to_owned()).or_default().insert(seq);
    }
    self.rows.insert(row.id(), (seq, row.clone()));
    Some(row)
  }

  fn remove(&mut self, id: Uuid) -> bool {
    let Some((seq, row)) = self.rows.remove(&id) else {
      return false;
    };
    self.order.remove(&seq);
    self.unindex_name(row.name(), seq);
    true
  }

  fn unindex_name(&mut self, name: &str, seq: u64) {
    if let Some(seqs) = self.by_name.get_mut(name) {
      seqs.remove(&seq);
      if seqs.is_empty() {
        self.by_name.remove(name);
      }
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Tables {
  countries: Table<Country>,
  persons:   Table<Person>,
}

/// An in-memory store, scoped to the lifetime of the value.
///
/// Cloning is cheap; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Tables>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> Result<R> {
    let guard = self.inner.read().map_err(|_| MemoryStoreError::Poisoned)?;
    Ok(f(&guard))
  }

  fn write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> Result<R> {
    let mut guard =
      self.inner.write().map_err(|_| MemoryStoreError::Poisoned)?;
    Ok(f(&mut guard))
  }
}

impl CountriesRepository for MemoryStore {
  type Error = MemoryStoreError;

  async fn add_country(&self, country: Country) -> Result<Option<Country>> {
    self.write(|t| t.countries.insert_if_name_absent(country))?
  }

  async fn get_all_countries(&self) -> Result<Vec<Country>> {
    self.read(|t| t.countries.all())
  }

  async fn get_country_by_id(&self, id: Uuid) -> Result<Option<Country>> {
    self.read(|t| t.countries.get(id))
  }

  async fn get_country_by_name(&self, name: &str) -> Result<Option<Country>> {
    self.read(|t| t.countries.first_by_name(name))
  }
}

impl PersonsRepository for MemoryStore {
  type Error = MemoryStoreError;

  async fn add_person(&self, person: Person) -> Result<Option<Person>> {
    self.write(|t| t.persons.insert_if_name_absent(person))?
  }

  async fn get_all_persons(&self) -> Result<Vec<Person>> {
    self.read(|t| t.persons.all())
  }

  async fn get_person_by_id(&self, id: Uuid) -> Result<Option<Person>> {
    self.read(|t| t.persons.get(id))
  }

  async fn get_person_by_name(&self, name: &str) -> Result<Option<Person>> {
    self.read(|t| t.persons.first_by_name(name))
  }

  async fn update_person(&self, person: Person) -> Result<Option<Person>> {
    self.write(|t| t.persons.replace(person))
  }

  async fn delete_person_by_id(&self, id: Uuid) -> Result<bool> {
    self.write(|t| t.persons.remove(id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::person::PersonAddRequest;

  fn person(name: &str) -> Person {
    PersonAddRequest {
      person_name: Some(name.into()),
      ..Default::default()
    }
    .into_person(Uuid::new_v4())
  }

  #[tokio::test]
  async fn keeps_insertion_order() {
    let s = MemoryStore::new();
    for name in ["Loid", "Yor", "Anya"] {
      s.add_person(person(name)).await.unwrap().unwrap();
    }
    let names: Vec<_> = s
      .get_all_persons()
      .await
      .unwrap()
      .into_iter()
      .map(|p| p.person_name)
      .collect();
    assert_eq!(names, ["Loid", "Yor", "Anya"]);
  }

  #[tokio::test]
  async fn name_index_follows_updates_and_deletes() {
    let s = MemoryStore::new();
    let mut loid = s.add_person(person("Loid")).await.unwrap().unwrap();

    loid.person_name = "Twilight".into();
    s.update_person(loid.clone()).await.unwrap();
    assert!(s.get_person_by_name("Loid").await.unwrap().is_none());
    assert_eq!(
      s.get_person_by_name("Twilight").await.unwrap().map(|p| p.person_id),
      Some(loid.person_id)
    );

    assert!(s.delete_person_by_id(loid.person_id).await.unwrap());
    assert!(s.get_person_by_name("Twilight").await.unwrap().is_none());
    assert!(!s.delete_person_by_id(loid.person_id).await.unwrap());
  }

  #[tokio::test]
  async fn first_by_name_prefers_oldest_row() {
    let s = MemoryStore::new();
    let first = s.add_person(person("Bond")).await.unwrap().unwrap();
    let mut second = s.add_person(person("Franky")).await.unwrap().unwrap();
    second.person_name = "Bond".into();
    s.update_person(second).await.unwrap();

    let found = s.get_person_by_name("Bond").await.unwrap().unwrap();
    assert_eq!(found.person_id, first.person_id);
  }

  #[tokio::test]
  async fn update_of_missing_row_returns_none() {
    let s = MemoryStore::new();
    assert!(s.update_person(person("Ghost")).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn duplicate_id_is_rejected() {
    let s = MemoryStore::new();
    let c = Country { country_id: Uuid::new_v4(), country_name: "Ostania".into() };
    s.add_country(c.clone()).await.unwrap();
    let renamed = Country { country_name: "Westalis".into(), ..c };
    let err = s.add_country(renamed).await.unwrap_err();
    assert!(matches!(err, MemoryStoreError::DuplicateId(_)));
  }

  #[tokio::test]
  async fn taken_name_is_not_inserted() {
    let s = MemoryStore::new();
    let ostania = |id| Country { country_id: id, country_name: "Ostania".into() };
    assert!(s.add_country(ostania(Uuid::new_v4())).await.unwrap().is_some());
    assert!(s.add_country(ostania(Uuid::new_v4())).await.unwrap().is_none());
    assert_eq!(s.get_all_countries().await.unwrap().len(), 1);

    assert!(s.add_person(person("Bond")).await.unwrap().is_some());
    assert!(s.add_person(person("Bond")).await.unwrap().is_none());
    assert_eq!(s.get_all_persons().await.unwrap().len(), 1);
  }
}
