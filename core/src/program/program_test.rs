use super::*;
use crate::codec::{decode, from_hex};
use crate::memory::{Operand, Values};
use crate::word::Word;

fn w(value: u64) -> Option<Word> {
    Some(Word::from(value))
}

#[test]
fn single_segment_serializes_exactly() {
    let mut pgr = Program::new();
    let main = pgr.segment("main").unwrap();
    main.push(1u64).unwrap();
    main.push(2u64).unwrap();
    main.add(None, None).unwrap();
    main.stop().unwrap();

    assert_eq!(pgr.serialize().unwrap(), from_hex("600160020100").unwrap());
    assert_eq!(pgr.to_hex().unwrap(), "600160020100");
    assert_eq!(pgr.code().len(), 4);
}

#[test]
fn segment_names_are_unique() {
    let mut pgr = Program::new();
    pgr.segment("a").unwrap();
    assert_eq!(
        pgr.segment("a").unwrap_err(),
        AsmError::DuplicateSegment("a".into())
    );
    assert_eq!(
        pgr.get("b").unwrap_err(),
        AsmError::UnknownSegment("b".into())
    );
    assert!(pgr.get_mut("a").is_ok());
    assert_eq!(
        pgr.offset_of("a").unwrap_err(),
        AsmError::UnresolvedOffset("a".into())
    );
}

#[test]
fn segments_are_flattened_in_program_order() {
    let mut pgr = Program::new();
    pgr.segment("first").unwrap().push(1u64).unwrap();
    pgr.segment("second").unwrap().stop().unwrap();
    pgr.get_mut("first").unwrap().pop().unwrap();
    assert_eq!(pgr.to_hex().unwrap(), "60015000");
}

#[test]
fn offsets_are_running_sums() {
    let mut pgr = Program::new();
    pgr.segment("a").unwrap().push(0x1234u64).unwrap();
    pgr.segment("b").unwrap();
    pgr.segment("c").unwrap().jumpdest().unwrap();
    pgr.resolve_offsets();
    assert_eq!(pgr.offset_of("a").unwrap(), 0);
    assert_eq!(pgr.offset_of("b").unwrap(), 3);
    assert_eq!(pgr.offset_of("c").unwrap(), 3);
}

#[test]
fn entry_jump_skips_to_its_target() {
    let mut pgr = Program::new();
    pgr.segment("lib").unwrap().jumpdest().unwrap();
    pgr.segment("body").unwrap();
    let entry = pgr.link_entry("main", "body").unwrap();

    // PUSH1 entry, JUMP, JUMPDEST
    assert_eq!(entry, 4);
    let names: Vec<&str> = pgr.segments().iter().map(Segment::name).collect();
    assert_eq!(names, vec!["main", "lib", "body"]);
    assert_eq!(pgr.offset_of("main").unwrap(), 0);
    assert_eq!(pgr.offset_of("lib").unwrap(), 3);
    assert_eq!(pgr.offset_of("body").unwrap(), 4);

    pgr.get_mut("body").unwrap().jumpdest().unwrap();
    assert_eq!(pgr.to_hex().unwrap(), "6004565b5b");
}

#[test]
fn entry_jump_width_grows_across_a_byte_boundary() {
    fn skipping(n: usize) -> Program {
        let mut pgr = Program::new();
        let lib = pgr.segment("lib").unwrap();
        for _ in 0..n {
            lib.jumpdest().unwrap();
        }
        pgr.segment("body").unwrap();
        pgr
    }

    let mut below = skipping(252);
    assert_eq!(below.link_entry("main", "body").unwrap(), 255);
    assert_eq!(below.get("main").unwrap().byte_len(), 3);

    let mut across = skipping(253);
    assert_eq!(across.link_entry("main", "body").unwrap(), 257);
    assert_eq!(across.get("main").unwrap().byte_len(), 4);
    assert_eq!(across.offset_of("body").unwrap(), 257);
    let bytes = across.serialize().unwrap();
    assert_eq!(&bytes[..4], &[0x61, 0x01, 0x01, 0x56]);
    assert_eq!(bytes.len(), 257);
}

#[test]
fn entry_link_validates_names() {
    let mut pgr = Program::new();
    pgr.segment("body").unwrap();
    assert_eq!(
        pgr.link_entry("main", "nope").unwrap_err(),
        AsmError::UnknownSegment("nope".into())
    );
    assert_eq!(
        pgr.link_entry("body", "body").unwrap_err(),
        AsmError::DuplicateSegment("body".into())
    );
    assert_eq!(pgr.segments().len(), 1);
}

#[test]
fn subroutines_return_through_one_slot() {
    let mut pgr = Program::new();
    let modulus = pgr.alloc_var("modulus").unwrap();
    let state = pgr.alloc_array("state", &[2]).unwrap();
    let fp = pgr.alloc_var("fp").unwrap();

    let square = pgr.segment("square").unwrap();
    square.jumpdest().unwrap();
    square.dup(1).unwrap();
    square.mload(Some(Operand::from(state.at(&[0]).unwrap()))).unwrap();
    square.dup(1).unwrap();
    square.mulmod(None, None, None).unwrap();
    square.mstore(Some(Operand::from(state.at(&[0]).unwrap())), None).unwrap();
    square.return_via(&fp).unwrap();

    pgr.segment("sponge").unwrap();
    let entry = pgr.link_entry("main", "sponge").unwrap();
    let square_at = pgr.offset_of("square").unwrap();
    assert_eq!(square_at, 3);

    let sponge = pgr.get_mut("sponge").unwrap();
    sponge.jumpdest().unwrap();
    sponge.mstore(Some(Operand::from(&modulus)), Some(Values::from(97u64))).unwrap();
    sponge.calldatacopy(Some(Operand::from(&state)), w(0), None).unwrap();
    sponge.mload(Some(Operand::from(&modulus))).unwrap();
    let first = sponge.call(&fp, square_at).unwrap();
    let second = sponge.call(&fp, square_at).unwrap();
    sponge.return_(Some(Operand::from(&state)), None).unwrap();

    let bytes = pgr.serialize().unwrap();
    for target in [entry, square_at, first, second] {
        assert_eq!(bytes[target as usize], 0x5b, "no JUMPDEST at {:#x}", target);
    }
    assert!(second > first);

    let code = decode(&bytes).unwrap();
    assert_eq!(code[0].name(), "PUSH1");
    assert_eq!(code[0].immediate(), &Word::from(entry));
    assert_eq!(code.len(), pgr.code().len());
}

#[test]
fn config_drives_memory_and_registers() {
    let config = AsmConfig {
        memory_base: 0x100,
        register_base: 0x100,
        register_limbs: 2,
        element_size: 16,
    };
    let mut pgr = Program::with_config(&config);
    let a = pgr.alloc_var("a").unwrap();
    let b = pgr.alloc_var("b").unwrap();
    assert_eq!((a.addr(), b.addr()), (0x100, 0x110));

    let seg = pgr.segment("main").unwrap();
    assert_eq!(seg.registers().width_bytes(), 16);
    seg.addmodx(&b, &a, &b).unwrap();
    assert_eq!(pgr.to_hex().unwrap(), "22010001");
}

#[test]
fn summary_reports_layout_and_counts() {
    let mut pgr = Program::new();
    pgr.alloc_array("state", &[3]).unwrap();
    let main = pgr.segment("main").unwrap();
    main.push(1u64).unwrap();
    main.push(0x100u64).unwrap();
    main.add(None, None).unwrap();
    pgr.segment("tail").unwrap().stop().unwrap();
    pgr.resolve_offsets();

    let summary = pgr.summary();
    assert_eq!(summary.byte_len, 7);
    assert_eq!(summary.memory_used, 96);
    assert_eq!(summary.segments[0].counts.get("PUSH"), Some(&2));
    assert_eq!(summary.segments[0].stack_effect, 1);
    assert_eq!(summary.segments[1].offset, Some(6));

    let json = summary.to_json().unwrap();
    let back: ProgramSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(back, summary);
}
