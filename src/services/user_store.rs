use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::errors::{AppError, AppResult};
use crate::models::User;

struct Directory {
    users: Vec<User>,
    next_id: u32,
}

impl Directory {
    fn new() -> Self {
        Self {
            users: Vec::new(),
            next_id: 1,
        }
    }

    fn find_mut(&mut self, id: u32) -> AppResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }
}

/// In-memory user directory shared by all handlers.
///
/// Every operation runs under one lock, so id allocation and the
/// lookup-then-mutate operations are atomic with respect to each other.
pub struct UserStore {
    inner: Arc<Mutex<Directory>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Directory::new())),
        }
    }

    // A panic while holding the lock cannot leave the directory half-updated,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Directory> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn list_all(&self) -> Vec<User> {
        self.lock().users.clone()
    }

    pub fn get_by_id(&self, id: u32) -> AppResult<User> {
        self.lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    pub fn create(&self, name: Option<&str>) -> AppResult<User> {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or(AppError::InvalidName)?;

        let mut directory = self.lock();
        let user = User::new(directory.next_id, name);
        directory.next_id += 1;
        directory.users.push(user.clone());
        Ok(user)
    }

    /// Replaces the name when `name` is non-blank; otherwise returns the record untouched.
    pub fn rename(&self, id: u32, name: Option<&str>) -> AppResult<User> {
        let mut directory = self.lock();
        let user = directory.find_mut(id)?;
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            user.name = name.to_string();
        }
        Ok(user.clone())
    }

    pub fn add_hours(&self, id: u32, delta: Option<f64>) -> AppResult<User> {
        let mut directory = self.lock();
        let user = directory.find_mut(id)?;
        let delta = delta.ok_or(AppError::InvalidHours)?;
        user.hours_worked += delta;
        Ok(user.clone())
    }

    pub fn delete_by_id(&self, id: u32) -> AppResult<Vec<User>> {
        let mut directory = self.lock();
        let index = directory
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;
        Ok(vec![directory.users.remove(index)])
    }

    pub fn delete_all(&self) -> Vec<User> {
        let mut directory = self.lock();
        directory.users.clear();
        directory.next_id = 1;
        Vec::new()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for UserStore {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_increasing_ids_from_one() {
        let store = UserStore::new();
        let ids: Vec<u32> = (0..5)
            .map(|i| store.create(Some(&format!("User {}", i))).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        // Deleting never frees an id for reuse
        store.delete_by_id(5).unwrap();
        assert_eq!(store.create(Some("Late")).unwrap().id, 6);
    }

    #[test]
    fn test_create_trims_and_round_trips() {
        let store = UserStore::new();
        let created = store.create(Some("  Test User \n")).unwrap();
        assert_eq!(created, User::new(1, "Test User"));
        assert_eq!(store.get_by_id(created.id).unwrap().name, "Test User");
    }

    #[test]
    fn test_blank_names_are_rejected_without_side_effects() {
        let store = UserStore::new();
        assert_eq!(store.create(Some("")), Err(AppError::InvalidName));
        assert_eq!(store.create(Some("   ")), Err(AppError::InvalidName));
        assert_eq!(store.create(None), Err(AppError::InvalidName));

        assert!(store.list_all().is_empty());
        assert_eq!(store.create(Some("First")).unwrap().id, 1);
    }

    #[test]
    fn test_get_missing_user() {
        let store = UserStore::new();
        assert_eq!(store.get_by_id(999), Err(AppError::UserNotFound("999".into())));
    }

    #[test]
    fn test_rename() {
        let store = UserStore::new();
        store.create(Some("Test User")).unwrap();

        assert_eq!(store.rename(1, Some(" Updated User ")).unwrap().name, "Updated User");
        // Blank or missing names leave the record as it was
        assert_eq!(store.rename(1, Some("  ")).unwrap().name, "Updated User");
        assert_eq!(store.rename(1, None).unwrap().name, "Updated User");
        assert_eq!(store.rename(2, Some("Nobody")), Err(AppError::UserNotFound("2".into())));
    }

    #[test]
    fn test_add_hours_is_additive() {
        let store = UserStore::new();
        store.create(Some("Worker")).unwrap();

        assert_eq!(store.add_hours(1, Some(5.0)).unwrap().hours_worked, 5.0);
        assert_eq!(store.add_hours(1, Some(2.5)).unwrap().hours_worked, 7.5);
        assert_eq!(store.add_hours(1, Some(-2.5)).unwrap().hours_worked, 5.0);
        assert_eq!(store.add_hours(1, Some(-5.0)).unwrap().hours_worked, 0.0);
    }

    #[test]
    fn test_add_hours_errors() {
        let store = UserStore::new();
        store.create(Some("Worker")).unwrap();

        assert_eq!(store.add_hours(1, None), Err(AppError::InvalidHours));
        assert_eq!(store.get_by_id(1).unwrap().hours_worked, 0.0);
        // Lookup happens before the value is checked
        assert_eq!(store.add_hours(7, None), Err(AppError::UserNotFound("7".into())));
    }

    #[test]
    fn test_delete_by_id_returns_removed_record() {
        let store = UserStore::new();
        store.create(Some("Keep")).unwrap();
        store.create(Some("Drop")).unwrap();

        assert_eq!(store.delete_by_id(2).unwrap(), vec![User::new(2, "Drop")]);
        assert_eq!(store.list_all(), vec![User::new(1, "Keep")]);
        assert_eq!(store.delete_by_id(2), Err(AppError::UserNotFound("2".into())));
    }

    #[test]
    fn test_list_length_tracks_creates_and_deletes() {
        let store = UserStore::new();
        for i in 0..10 {
            store.create(Some(&format!("User {}", i))).unwrap();
        }
        store.delete_by_id(3).unwrap();
        store.delete_by_id(7).unwrap();
        assert!(store.delete_by_id(3).is_err());

        let names: Vec<String> = store.list_all().into_iter().map(|u| u.name).collect();
        assert_eq!(names.len(), 8);
        assert_eq!(names.first().map(String::as_str), Some("User 0"));
        assert_eq!(names.last().map(String::as_str), Some("User 9"));
    }

    #[test]
    fn test_delete_all_is_idempotent_and_resets_ids() {
        let store = UserStore::new();
        store.create(Some("A")).unwrap();
        store.create(Some("B")).unwrap();

        assert!(store.delete_all().is_empty());
        assert!(store.delete_all().is_empty());
        assert!(store.list_all().is_empty());
        assert_eq!(store.create(Some("C")).unwrap().id, 1);
    }

    #[test]
    fn test_concurrent_creates_get_distinct_ids() {
        let store = UserStore::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..50)
                        .map(|i| store.create(Some(&format!("T{} U{}", t, i))).unwrap().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u32> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=400).collect::<Vec<_>>());
    }
}
