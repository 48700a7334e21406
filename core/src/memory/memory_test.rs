use super::*;

#[test]
fn allocations_are_sequential_and_disjoint() {
    let mut mem = MemoryAllocator::new();
    let modulus = mem.alloc_var("modulus").unwrap();
    let state = mem.alloc_array("state", &[3]).unwrap();
    let mds = mem.alloc_array("mds", &[3, 3]).unwrap();
    let wide = mem.alloc("wide", 64, None).unwrap();
    let fp = mem.alloc_var("fp").unwrap();

    assert_eq!(modulus.addr(), 0);
    assert_eq!(state.addr(), 32);
    assert_eq!(mds.addr(), 32 + 3 * 32);
    assert_eq!(wide.addr(), mds.addr() + 9 * 32);
    assert_eq!(fp.addr(), wide.addr() + 64);
    assert_eq!(mem.allocated(), fp.addr() + 32);

    let views = mem.views();
    for pair in views.windows(2) {
        assert!(pair[0].addr() + pair[0].footprint() <= pair[1].addr());
        assert!(pair[0].addr() < pair[1].addr());
    }
}

#[test]
fn duplicate_names_are_rejected() {
    let mut mem = MemoryAllocator::new();
    mem.alloc_var("x").unwrap();
    let before = mem.allocated();
    assert_eq!(
        mem.alloc_array("x", &[2]).unwrap_err(),
        AsmError::DuplicateAllocation("x".into())
    );
    assert_eq!(mem.allocated(), before, "failed allocation must not move the pointer");
}

#[test]
fn lookup_by_name() {
    let mut mem = MemoryAllocator::new();
    mem.alloc_array("rk", &[4]).unwrap();
    assert!(mem.contains("rk"));
    assert!(!mem.contains("state"));
    let view = mem.get("rk").unwrap();
    assert_eq!(view.footprint(), 4 * 32);
    assert!(matches!(view, View::Array(_)));
}

#[test]
fn empty_shape_allocates_a_scalar() {
    let mut mem = MemoryAllocator::new();
    let view = mem.alloc("s", 32, Some(&[])).unwrap();
    assert!(matches!(view, View::Scalar(_)));
    assert_eq!(mem.allocated(), 32);
}

#[test]
fn config_moves_the_base() {
    let config = AsmConfig {
        memory_base: 0x80,
        register_base: 0x80,
        ..AsmConfig::default()
    };
    let mut mem = MemoryAllocator::with_config(&config);
    let a = mem.alloc_var("a").unwrap();
    let b = mem.alloc_var("b").unwrap();
    assert_eq!(a.addr(), 0x80);
    assert_eq!(mem.used(), 64);
    assert_eq!(mem.slot(&a).unwrap(), 0);
    assert_eq!(mem.slot(&b).unwrap(), 1);
}

#[test]
fn slots_follow_register_width() {
    let mut mem = MemoryAllocator::new();
    let state = mem.alloc_array("state", &[5]).unwrap();
    assert_eq!(mem.slot(&state.at(&[0]).unwrap()).unwrap(), 0);
    assert_eq!(mem.slot(&state.at(&[4]).unwrap()).unwrap(), 4);

    let six_limbs = RegisterFile { base: 0, limbs: 6 };
    assert_eq!(six_limbs.slot(&Variable::new("v", 96, 48)).unwrap(), 2);
}

#[test]
fn misaligned_or_low_addresses_have_no_slot() {
    let regs = RegisterFile { base: 64, limbs: 4 };
    assert_eq!(
        regs.slot(&Variable::new("low", 32, 32)).unwrap_err(),
        AsmError::MisalignedSlot {
            name: "low".into(),
            addr: 32
        }
    );
    assert!(regs.slot(&Variable::new("odd", 80, 32)).is_err());
    assert_eq!(regs.slot(&Variable::new("ok", 128, 32)).unwrap(), 2);
}

#[test]
fn overflowing_allocations_are_rejected() {
    let mut mem = MemoryAllocator::new();
    assert_eq!(
        mem.alloc("big", 32, Some(&[1usize << 40, 1usize << 40])).unwrap_err(),
        AsmError::AllocationOverflow("big".into())
    );
    assert!(!mem.contains("big"));
    assert_eq!(mem.allocated(), 0);

    mem.alloc("a", u64::MAX, None).unwrap();
    assert_eq!(mem.allocated(), u64::MAX);
    assert_eq!(
        mem.alloc("b", 32, None).unwrap_err(),
        AsmError::AllocationOverflow("b".into())
    );
    assert!(!mem.contains("b"));
    assert_eq!(mem.views().len(), 1);
    assert_eq!(mem.allocated(), u64::MAX);
}
