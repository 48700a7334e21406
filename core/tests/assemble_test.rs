use std::sync::Once;

use stackasm_core::codec::{self, decode_hex, listing};
use stackasm_core::memory::Index;
use stackasm_core::{AsmConfig, AsmError, Operand, Program, Values, Word};

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

struct Params {
    width: usize,
    rate: usize,
    full_rounds: usize,
    partial_rounds: usize,
    modulus: u64,
}

fn some(value: u64) -> Option<Word> {
    Some(Word::from(value))
}

/// Sponge over an x^3 permutation: full and partial rounds live in their own
/// subroutines, the sponge body calls them once per round.
fn permutation(params: &Params) -> Result<(Program, Vec<u64>), AsmError> {
    let n = params.width;
    let mut pgr = Program::new();
    let modulus = pgr.alloc_var("modulus")?;
    let state = pgr.alloc_array("state", &[n])?;
    let temp = pgr.alloc_array("temp", &[n])?;
    let mds = pgr.alloc_array("mds", &[n, n])?;
    let rk = pgr.alloc_array("rk", &[n])?;
    let fp = pgr.alloc_var("fp")?;

    for (name, sboxes) in [("permute_partial", 1), ("permute_full", n)] {
        let seg = pgr.segment(name)?;
        seg.jumpdest()?;
        for j in 0..n {
            let with_sbox = j < sboxes;
            let copies = if with_sbox { 3 } else { 1 };
            for _ in 0..copies {
                seg.dup(1)?;
            }
            seg.mload(Some(Operand::from(rk.at(&[j])?)))?;
            seg.mload(Some(Operand::from(state.at(&[j])?)))?;
            seg.addmod(None, None, None)?;
            if with_sbox {
                seg.swap(1)?;
                seg.dup(2)?;
                seg.dup(1)?;
                seg.mulmod(None, None, None)?;
                seg.mulmod(None, None, None)?;
            }
            seg.mstore(Some(Operand::from(temp.at(&[j])?)), None)?;
        }
        for j in 0..n {
            for _ in 0..2 * n - 1 {
                seg.dup(1)?;
            }
            let row = mds.get(j)?.into_array()?;
            for k in 0..n {
                seg.mload(Some(Operand::from(row.at(&[k])?)))?;
                seg.mload(Some(Operand::from(temp.at(&[k])?)))?;
                seg.mulmod(None, None, None)?;
                let depth = (2 * n) as isize - 2 * k as isize - 3;
                if depth > 0 {
                    seg.swap(depth as usize)?;
                }
            }
            for _ in 0..n - 1 {
                seg.addmod(None, None, None)?;
            }
            seg.mstore(Some(Operand::from(state.at(&[j])?)), None)?;
        }
        seg.return_via(&fp)?;
    }

    pgr.segment("sponge")?;
    let entry = pgr.link_entry("main", "sponge")?;
    let partial_at = pgr.offset_of("permute_partial")?;
    let full_at = pgr.offset_of("permute_full")?;

    let mut targets = vec![entry, partial_at, full_at];
    let matrix: Vec<Vec<u64>> = (0..n)
        .map(|i| (0..n).map(|j| (i * n + j + 1) as u64).collect())
        .collect();
    let rate = state.index(&[Index::from(..params.rate)])?;

    let sponge = pgr.get_mut("sponge")?;
    sponge.jumpdest()?;
    sponge.mstore(Some(Operand::from(&modulus)), Some(Values::from(params.modulus)))?;
    sponge.calldatacopy(Some(Operand::from(&rate)), some(0), None)?;
    sponge.mstore(Some(Operand::from(&mds)), Some(Values::from(matrix)))?;
    sponge.mload(Some(Operand::from(&modulus)))?;
    let half = params.full_rounds / 2;
    let rounds = params.full_rounds + params.partial_rounds;
    for round in 0..rounds {
        let keys: Vec<u64> = (0..n).map(|j| (round * n + j) as u64).collect();
        sponge.mstore(Some(Operand::from(&rk)), Some(Values::from(keys)))?;
        let full = round < half || round >= half + params.partial_rounds;
        targets.push(sponge.call(&fp, if full { full_at } else { partial_at })?);
    }
    sponge.return_(Some(Operand::from(&rate)), None)?;
    Ok((pgr, targets))
}

#[test]
fn permutation_program_lands_on_every_jump_target() {
    init_tracing();
    let params = Params {
        width: 3,
        rate: 2,
        full_rounds: 8,
        partial_rounds: 57,
        modulus: 0xffff_ffff_0000_0001,
    };
    let (mut pgr, targets) = permutation(&params).unwrap();
    let bytes = pgr.serialize().unwrap();
    assert!(bytes.len() > 256, "program should need two-byte return addresses");

    for target in &targets {
        assert_eq!(bytes[*target as usize], 0x5b, "no JUMPDEST at {:#x}", target);
    }
    let returns = &targets[3..];
    assert_eq!(returns.len(), 65);
    assert!(returns.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(returns.iter().any(|ret| *ret > 0xff));

    let hex = codec::to_hex(&bytes);
    let decoded = decode_hex(&hex).unwrap();
    assert_eq!(decoded, pgr.code());

    let text = listing(&decoded, 0);
    assert_eq!(text.lines().count(), decoded.len());
    assert!(text.lines().next().unwrap().contains("PUSH"));

    let summary = pgr.summary();
    assert_eq!(summary.byte_len, bytes.len());
    let sponge = summary.segments.iter().find(|s| s.name == "sponge").unwrap();
    assert_eq!(sponge.counts.get("JUMPDEST"), Some(&66));
    assert!(summary.to_json().unwrap().contains("\"permute_full\""));
}

#[test]
fn configured_program_uses_configured_layout() {
    init_tracing();
    let config = AsmConfig::from_toml_str(
        r#"
        memory_base = 256
        register_base = 256
        register_limbs = 6
        element_size = 48
        "#,
    )
    .unwrap();
    let mut pgr = Program::with_config(&config);
    let m = pgr.alloc_var("m").unwrap();
    let x = pgr.alloc_array("x", &[2]).unwrap();

    let seg = pgr.segment("main").unwrap();
    seg.setmodx(&m).unwrap();
    seg.mulmontx(&x.at(&[1]).unwrap(), &x.at(&[0]).unwrap(), &m).unwrap();
    seg.op("TOMONTX").unwrap();
    seg.stop().unwrap();

    // PUSH1 06, PUSH2 0100, SETMODX, MULMONTX 020100, TOMONTX, STOP
    assert_eq!(pgr.to_hex().unwrap(), "600661010021240201002500");
}

#[test]
fn shape_errors_surface_to_the_caller() {
    let mut pgr = Program::new();
    let v = pgr.alloc_array("v", &[3]).unwrap();
    let seg = pgr.segment("main").unwrap();
    let err = seg
        .mstore(Some(Operand::from(&v)), Some(Values::from(vec![vec![1u64, 2], vec![3, 4]])))
        .unwrap_err();
    assert!(matches!(err, AsmError::ShapeMismatch { .. }));
    assert!(err.to_string().contains("v"));
}
