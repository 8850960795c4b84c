//! Export to .bench (ISCAS) files

use std::io::{Result, Write};

use fxhash::FxHashMap;

use crate::logic::{Expressions, Literal, Operand, Reading, Term};

/// Name of the input signal for a bit, possibly inverted
fn input_name(operand: Operand, index: usize, inverted: bool) -> String {
    let lit = Literal { operand, index };
    lit.to_string() + (if inverted { "_n" } else { "" })
}

/// Input bits of the And gate of a term, with their inversion
fn term_inputs(term: &Term, reading: Reading) -> Vec<(Operand, usize, bool)> {
    match reading {
        Reading::Literals => term
            .literals()
            .map(|l| (l.operand, l.index, false))
            .collect(),
        Reading::Minterm => {
            let first = term.key().first();
            let second = term.key().second();
            let a = (0..first.width().bits()).map(|i| (Operand::A, i, !first.bit(i)));
            let b = (0..second.width().bits()).map(|i| (Operand::B, i, !second.bit(i)));
            a.chain(b).collect()
        }
    }
}

/// Write expressions in .bench format, as used by the ISCAS benchmarks
///
/// Each distinct term becomes an And gate shared by all outputs using it, and each output an
/// Or of its terms:
/// ```text
///     INPUT(a0)
///     INPUT(b0)
///     OUTPUT(c0)
///     t0 = AND(a0, b0_n)
///     c0 = BUF(t0)
///     b0_n = NOT(b0)
/// ```
/// With the literal reading, terms only use positive literals. With the minterm reading, each
/// term fixes every input bit, using inverted inputs for the bits that are not set.
pub fn write_bench<W: Write>(w: &mut W, exprs: &Expressions, reading: Reading) -> Result<()> {
    // Terms wider than the expressions use more input bits
    let nb_bits = exprs
        .outputs()
        .iter()
        .flat_map(|e| e.terms())
        .map(|t| t.key().first().width().max(t.key().second().width()).bits())
        .fold(exprs.width().bits(), usize::max);
    writeln!(w, "# .bench (ISCAS) file")?;
    writeln!(w, "# Generated by bitsynth")?;
    for operand in [Operand::A, Operand::B] {
        for i in 0..nb_bits {
            writeln!(w, "INPUT({})", input_name(operand, i, false))?;
        }
    }
    writeln!(w)?;
    for i in 0..exprs.nb_outputs() {
        writeln!(w, "OUTPUT(c{})", i)?;
    }
    writeln!(w)?;

    // Share the And gate of a term between outputs
    let mut term_names = FxHashMap::<Term, String>::default();
    let mut inverted = vec![[false; 2]; nb_bits];
    let mut nb_gates = 0;
    for e in exprs.outputs() {
        for t in e.terms() {
            if term_names.contains_key(t) {
                continue;
            }
            let mut inputs = Vec::new();
            for (operand, i, inv) in term_inputs(t, reading) {
                if inv {
                    inverted[i][operand as usize] = true;
                }
                inputs.push(input_name(operand, i, inv));
            }
            let name = match inputs.len() {
                0 => "vdd".to_string(),
                1 => inputs[0].clone(),
                _ => {
                    let name = format!("t{}", nb_gates);
                    nb_gates += 1;
                    writeln!(w, "{} = AND({})", name, inputs.join(", "))?;
                    name
                }
            };
            term_names.insert(*t, name);
        }
    }

    for (i, e) in exprs.outputs().iter().enumerate() {
        let rep = e
            .terms()
            .iter()
            .map(|t| term_names[t].as_str())
            .collect::<Vec<_>>()
            .join(", ");
        match e.len() {
            0 => writeln!(w, "c{} = gnd", i)?,
            1 => writeln!(w, "c{} = BUF({})", i, rep)?,
            _ => writeln!(w, "c{} = OR({})", i, rep)?,
        }
    }

    for operand in [Operand::A, Operand::B] {
        for (i, inv) in inverted.iter().enumerate() {
            if inv[operand as usize] {
                let s = input_name(operand, i, false);
                writeln!(w, "{}_n = NOT({})", s, s)?;
            }
        }
    }
    Ok(())
}
