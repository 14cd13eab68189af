use std::{cell::Cell, rc::Rc};

use jonark::data_structures::handle::{Handle, HandleError, Manager, Resource};

#[derive(Debug)]
struct Counted {
    value: u32,
    released: Rc<Cell<u32>>,
}

impl Resource for Counted {
    const KIND: &'static str = "counted";

    fn release(self) {
        self.released.set(self.released.get() + 1);
    }
}

fn counted(value: u32, released: &Rc<Cell<u32>>) -> Counted {
    Counted {
        value,
        released: released.clone(),
    }
}

#[test]
fn should_reject_zero_capacity() {
    let err = Manager::<Counted>::with_capacity(0).unwrap_err();
    assert_eq!(err, HandleError::InvalidCapacity { kind: "counted" });
}

#[test]
fn should_not_allocate_up_front_for_large_capacities() {
    let released = Rc::new(Cell::new(0));
    let mut manager = Manager::with_capacity(usize::MAX).unwrap();
    assert_eq!(manager.capacity(), usize::MAX);
    assert!(manager.is_empty());

    let handle = manager.insert(counted(1, &released)).unwrap();
    assert_eq!(manager.get(handle).unwrap().value, 1);
}

#[test]
fn should_issue_sequential_handles() {
    let released = Rc::new(Cell::new(0));
    let mut manager = Manager::with_capacity(3).unwrap();
    let a = manager.insert(counted(10, &released)).unwrap();
    let b = manager.insert(counted(20, &released)).unwrap();

    assert_eq!(a.index(), 0);
    assert_eq!(b.index(), 1);
    assert_eq!(manager.get(a).unwrap().value, 10);
    assert_eq!(manager.get(b).unwrap().value, 20);
    assert_eq!(manager.len(), 2);
    assert_eq!(manager.capacity(), 3);
}

#[test]
fn should_fail_when_capacity_is_exceeded() {
    let released = Rc::new(Cell::new(0));
    let mut manager = Manager::with_capacity(1).unwrap();
    manager.insert(counted(1, &released)).unwrap();

    let err = manager.insert(counted(2, &released)).unwrap_err();
    assert_eq!(err, HandleError::CapacityExceeded { kind: "counted", max: 1 });
    assert_eq!(err.to_string(), "Maximum number of counted resources (1) exceeded");
    // the rejected value is released right away
    assert_eq!(released.get(), 1);
}

#[test]
fn should_not_reuse_destroyed_slots() {
    let released = Rc::new(Cell::new(0));
    let mut manager = Manager::with_capacity(2).unwrap();
    let first = manager.insert(counted(1, &released)).unwrap();
    manager.destroy(first).unwrap();

    assert_eq!(released.get(), 1);
    assert!(!manager.is_valid_handle(first));
    assert_eq!(
        manager.get(first).unwrap_err(),
        HandleError::Destroyed { kind: "counted", index: 0 }
    );
    assert_eq!(manager.live(), 0);

    let second = manager.insert(counted(2, &released)).unwrap();
    assert_eq!(second.index(), 1);
    // capacity counts issued handles, destroyed or not
    assert!(manager.insert(counted(3, &released)).is_err());
}

#[test]
fn should_reject_unknown_handles() {
    let manager = Manager::<Counted>::with_capacity(2).unwrap();
    let err = manager.get(Handle::from_raw(5)).unwrap_err();
    assert_eq!(err, HandleError::InvalidHandle { kind: "counted", index: 5 });
}

#[test]
fn should_invalidate_manager_on_destroy_all() {
    let released = Rc::new(Cell::new(0));
    let mut manager = Manager::with_capacity(3).unwrap();
    let a = manager.insert(counted(1, &released)).unwrap();
    let b = manager.insert(counted(2, &released)).unwrap();
    manager.destroy(a).unwrap();

    manager.destroy_all().unwrap();
    assert_eq!(released.get(), 2);
    assert!(!manager.is_valid());

    let destroyed = HandleError::ManagerDestroyed { kind: "counted" };
    assert_eq!(manager.get(b).unwrap_err(), destroyed);
    assert_eq!(manager.insert(counted(3, &released)).unwrap_err(), destroyed);
    assert_eq!(manager.destroy_all().unwrap_err(), destroyed);
    assert_eq!(destroyed.to_string(), "counted manager is not valid anymore");
    // insert released the rejected value as well
    assert_eq!(released.get(), 3);
}

#[test]
fn should_release_everything_on_drop() {
    let released = Rc::new(Cell::new(0));
    {
        let mut manager = Manager::with_capacity(4).unwrap();
        for i in 0..4 {
            manager.insert(counted(i, &released)).unwrap();
        }
    }
    assert_eq!(released.get(), 4);
}

#[test]
fn should_iterate_live_resources_only() {
    let released = Rc::new(Cell::new(0));
    let mut manager = Manager::with_capacity(3).unwrap();
    let handles: Vec<_> = (0..3)
        .map(|i| manager.insert(counted(i, &released)).unwrap())
        .collect();
    manager.destroy(handles[1]).unwrap();

    let values: Vec<_> = manager.iter().map(|(h, c)| (h.index(), c.value)).collect();
    assert_eq!(values, vec![(0, 0), (2, 2)]);
}

#[test]
fn should_mutate_through_handle() {
    let released = Rc::new(Cell::new(0));
    let mut manager = Manager::with_capacity(1).unwrap();
    let handle = manager.insert(counted(1, &released)).unwrap();
    manager.get_mut(handle).unwrap().value = 42;
    assert_eq!(manager.get(handle).unwrap().value, 42);
}
