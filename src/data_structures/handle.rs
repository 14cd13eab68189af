//! Fixed-capacity, handle-based resource managers.
//!
//! Every GPU-side object a demo creates (fonts, meshes, textures, programs and
//! vertex arrays) lives inside a [`Manager`] and is referred to by a copyable
//! [`Handle`]. Handles are plain indices issued in creation order. A destroyed
//! slot is never handed out again, so a stale handle can always be detected
//! instead of silently aliasing a newer resource.

use std::{
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use thiserror::Error;

/// A resource that can be stored inside a [`Manager`].
pub trait Resource: Sized {
    /// Human readable resource name used in diagnostics, e.g. `"mesh"`.
    const KIND: &'static str;

    /// Free the native objects owned by this resource.
    ///
    /// The default simply drops the value, which is enough for resources
    /// whose wgpu objects release themselves. Buffers and textures override
    /// it to free GPU memory eagerly.
    fn release(self) {
        drop(self)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    #[error("{kind} manager capacity must be greater than zero")]
    InvalidCapacity { kind: &'static str },
    #[error("{kind} manager is not valid anymore")]
    ManagerDestroyed { kind: &'static str },
    #[error("Maximum number of {kind} resources ({max}) exceeded")]
    CapacityExceeded { kind: &'static str, max: usize },
    #[error("{kind} handle {index} is out of range")]
    InvalidHandle { kind: &'static str, index: u32 },
    #[error("{kind} handle {index} refers to a destroyed {kind}")]
    Destroyed { kind: &'static str, index: u32 },
}

/// Typed index into a [`Manager<T>`].
pub struct Handle<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn new(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// Build a handle from a raw index without checking it against a manager.
    ///
    /// Lookups through such a handle are still validated.
    pub fn from_raw(index: u32) -> Self {
        Self::new(index)
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.index)
    }
}

/// Owns up to `capacity` resources of one kind.
///
/// Handles are issued sequentially and slots are never reused. Once
/// [`destroy_all`](Self::destroy_all) ran, the manager rejects every further
/// operation with [`HandleError::ManagerDestroyed`].
pub struct Manager<T: Resource> {
    slots: Vec<Option<T>>,
    max: usize,
    valid: bool,
}

impl<T: Resource> Manager<T> {
    pub fn with_capacity(max: usize) -> Result<Self, HandleError> {
        if max == 0 {
            return Err(HandleError::InvalidCapacity { kind: T::KIND });
        }
        log::debug!("Created {} manager with capacity {}", T::KIND, max);
        Ok(Self {
            slots: Vec::new(),
            max,
            valid: true,
        })
    }

    /// Fail early when no further resource can be stored.
    ///
    /// Type-specific constructors call this before allocating GPU objects.
    pub fn ensure_capacity(&self) -> Result<(), HandleError> {
        self.ensure_valid()?;
        if self.slots.len() >= self.max {
            return Err(HandleError::CapacityExceeded {
                kind: T::KIND,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn insert(&mut self, value: T) -> Result<Handle<T>, HandleError> {
        if let Err(e) = self.ensure_capacity() {
            value.release();
            return Err(e);
        }
        let handle = Handle::new(self.slots.len() as u32);
        self.slots.push(Some(value));
        Ok(handle)
    }

    pub fn get(&self, handle: Handle<T>) -> Result<&T, HandleError> {
        self.ensure_valid()?;
        match self.slots.get(handle.index as usize) {
            None => Err(HandleError::InvalidHandle {
                kind: T::KIND,
                index: handle.index,
            }),
            Some(None) => Err(HandleError::Destroyed {
                kind: T::KIND,
                index: handle.index,
            }),
            Some(Some(value)) => Ok(value),
        }
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Result<&mut T, HandleError> {
        self.ensure_valid()?;
        match self.slots.get_mut(handle.index as usize) {
            None => Err(HandleError::InvalidHandle {
                kind: T::KIND,
                index: handle.index,
            }),
            Some(None) => Err(HandleError::Destroyed {
                kind: T::KIND,
                index: handle.index,
            }),
            Some(Some(value)) => Ok(value),
        }
    }

    pub fn is_valid_handle(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_ok()
    }

    /// Release the resource behind `handle`. The slot stays occupied.
    pub fn destroy(&mut self, handle: Handle<T>) -> Result<(), HandleError> {
        self.get(handle)?;
        if let Some(value) = self.slots[handle.index as usize].take() {
            log::debug!("Destroyed {} {}", T::KIND, handle.index);
            value.release();
        }
        Ok(())
    }

    /// Release every live resource and invalidate the manager.
    pub fn destroy_all(&mut self) -> Result<(), HandleError> {
        self.ensure_valid()?;
        for value in self.slots.drain(..).flatten() {
            value.release();
        }
        self.valid = false;
        log::debug!("Destroyed {} manager", T::KIND);
        Ok(())
    }

    /// Number of handles issued so far, destroyed ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max
    }

    /// Number of resources that have not been destroyed.
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|value| (Handle::new(i as u32), value)))
    }

    pub fn ensure_valid(&self) -> Result<(), HandleError> {
        if self.valid {
            Ok(())
        } else {
            Err(HandleError::ManagerDestroyed { kind: T::KIND })
        }
    }
}

impl<T: Resource> fmt::Debug for Manager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("kind", &T::KIND)
            .field("len", &self.slots.len())
            .field("live", &self.live())
            .field("capacity", &self.max)
            .field("valid", &self.valid)
            .finish()
    }
}

impl<T: Resource> Drop for Manager<T> {
    fn drop(&mut self) {
        if self.valid {
            let _ = self.destroy_all();
        }
    }
}
