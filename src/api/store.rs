//! Member storage.
//!
//! Handlers only see the [`MemberStore`] trait. [`InMemoryStore`] is the
//! process-local backend; it keeps nothing across restarts.

use super::member::Member;
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

pub trait MemberStore: Send + Sync {
    fn get(&self, email: &str) -> Option<Member>;

    /// Insert or replace the record for `member.email`, returning the replaced record.
    fn put(&self, member: Member) -> Option<Member>;

    fn remove(&self, email: &str) -> Option<Member>;

    /// Apply `change` to the stored record atomically and return the result,
    /// or `None` if no record exists for `email`.
    fn update(&self, email: &str, change: &mut dyn FnMut(&mut Member)) -> Option<Member>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Members kept in a `HashMap` behind a single lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    members: RwLock<HashMap<String, Member>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// A panic while holding the lock cannot leave a half-written `Member` behind,
// so a poisoned lock is still safe to use.
impl MemberStore for InMemoryStore {
    fn get(&self, email: &str) -> Option<Member> {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .cloned()
    }

    fn put(&self, member: Member) -> Option<Member> {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(member.email.clone(), member)
    }

    fn remove(&self, email: &str) -> Option<Member> {
        self.members
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(email)
    }

    fn update(&self, email: &str, change: &mut dyn FnMut(&mut Member)) -> Option<Member> {
        let mut members = self.members.write().unwrap_or_else(PoisonError::into_inner);
        let member = members.get_mut(email)?;
        change(member);
        Some(member.clone())
    }

    fn len(&self) -> usize {
        self.members
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
