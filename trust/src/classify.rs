//! Transaction classification.
//!
//! A transaction is tried as a trust increase first and as a set of trust
//! decreases otherwise. Unrecognized shapes yield no edges; only a
//! continuation that would raise an existing chain's trust is an error.

use tir_chain::{Output, ScriptType, Transaction};
use tir_crypto::derive_entity;
use tir_types::{Entity, PublicKey, TxHash};
use tracing::debug;

use crate::edge::{DirectTrust, EdgeId, TrustOutput};
use crate::ledger::TrustLedger;
use crate::tag::tag_key;
use crate::TrustError;

/// The edges `tx` (with hash `hash`) would add to `ledger`.
pub fn classify(
    ledger: &TrustLedger,
    tx: &Transaction,
    hash: TxHash,
) -> Result<Vec<DirectTrust>, TrustError> {
    if let Some(increase) = parse_increase(ledger, tx, hash) {
        return Ok(vec![increase]);
    }
    parse_decreases(ledger, tx, hash)
}

/// One input spending a plain pay-to-pubkey-hash coin, one trust output from
/// the sender, and nothing else but change back to the sender.
pub fn parse_increase(ledger: &TrustLedger, tx: &Transaction, hash: TxHash) -> Option<DirectTrust> {
    let [input] = tx.inputs.as_slice() else {
        return None;
    };
    if ledger.is_trust_output(&input.prevout) {
        return None;
    }
    let sender = input.sender_entity()?;

    if tx.outputs.is_empty() || tx.outputs.len() > 2 {
        return None;
    }

    let mut trusts = search_trust_outputs(tx, hash, &sender);
    if trusts.len() != 1 {
        return None;
    }
    let change = tx
        .outputs
        .iter()
        .filter(|output| is_change_output(output, &sender))
        .count();
    if change + 1 != tx.outputs.len() {
        return None;
    }

    let edge = trusts.pop()?;
    if edge.amount == 0 {
        debug!(tx = %hash, "zero-valued trust output ignored");
        return None;
    }
    debug!(tx = %hash, origin = %sender, amount = edge.amount, "trust increase");
    Some(edge)
}

/// One edge per input that spends a recorded trust output: a continuation
/// if the transaction has a single input and exactly one trust output from
/// the same origin to the same destination with a non-zero value, a
/// nullifying edge otherwise.
pub fn parse_decreases(
    ledger: &TrustLedger,
    tx: &Transaction,
    hash: TxHash,
) -> Result<Vec<DirectTrust>, TrustError> {
    tx.inputs
        .iter()
        .filter_map(|input| ledger.by_outpoint(&input.prevout))
        .map(|(prev_id, prev)| parse_decrease(tx, hash, prev_id, prev))
        .collect()
}

fn parse_decrease(
    tx: &Transaction,
    hash: TxHash,
    prev_id: EdgeId,
    prev: &DirectTrust,
) -> Result<DirectTrust, TrustError> {
    let nullified = prev.nullify(prev_id, hash);
    if tx.inputs.len() != 1 {
        debug!(tx = %hash, prev = %prev.tx_hash, "multi-input spend nullifies trust");
        return Ok(nullified);
    }

    // Candidates are matched on origin only.
    let mut candidates = search_trust_outputs(tx, hash, &prev.origin_entity());
    if candidates.len() != 1 {
        debug!(
            tx = %hash,
            prev = %prev.tx_hash,
            candidates = candidates.len(),
            "no unique continuation, trust nullified"
        );
        return Ok(nullified);
    }
    let Some(next) = candidates.pop() else {
        return Ok(nullified);
    };
    if next.dest != prev.dest {
        debug!(tx = %hash, prev = %prev.tx_hash, "continuation names another party, trust nullified");
        return Ok(nullified);
    }
    if next.amount > prev.amount {
        return Err(TrustError::InvariantViolation(format!(
            "tx {} raises trust from {} to {}",
            hash, prev.amount, next.amount
        )));
    }
    if next.amount == 0 {
        // An empty output carries no trust and must not stay spendable.
        debug!(tx = %hash, prev = %prev.tx_hash, "zero continuation, trust nullified");
        return Ok(nullified);
    }

    debug!(tx = %hash, prev = %prev.tx_hash, amount = next.amount, "trust decrease");
    Ok(DirectTrust::new(
        next.origin,
        next.dest,
        next.amount,
        hash,
        next.output,
        Some(prev_id),
    ))
}

/// Trust outputs of `tx` that name `sender` as one participant.
pub fn search_trust_outputs(tx: &Transaction, hash: TxHash, sender: &Entity) -> Vec<DirectTrust> {
    tx.outputs
        .iter()
        .enumerate()
        .filter_map(|(index, output)| parse_trust_output(output, index as u32, hash, sender))
        .collect()
}

/// Read `output` as trust from `sender`.
///
/// Accepts a 1-of-2 multisig over two distinct participants, or a 1-of-3
/// multisig over two distinct participants and the tag key. The participant
/// whose entity is `sender` becomes the origin, the other the destination.
pub fn parse_trust_output(
    output: &Output,
    index: u32,
    hash: TxHash,
    sender: &Entity,
) -> Option<DirectTrust> {
    if output.script_type() != ScriptType::Multisig {
        return None;
    }
    let (a, b) = participants(output)?;

    let a_entity = derive_entity(&a);
    let b_entity = derive_entity(&b);
    if a_entity == b_entity {
        return None;
    }
    let (origin, dest) = if &a_entity == sender {
        (a, b)
    } else if &b_entity == sender {
        (b, a)
    } else {
        return None;
    };

    Some(DirectTrust::new(
        origin,
        dest,
        output.value,
        hash,
        Some(TrustOutput {
            index,
            script: output.script.clone(),
        }),
        None,
    ))
}

/// The two non-tag keys of a trust-shaped script.
fn participants(output: &Output) -> Option<(PublicKey, PublicKey)> {
    let (m, keys) = output.script.multisig_keys()?;
    if m != 1 {
        return None;
    }
    let tag = tag_key();
    let mut keys = match keys.len() {
        2 => keys,
        3 => {
            let tag_count = keys.iter().filter(|k| *k == tag).count();
            if tag_count != 1 {
                return None;
            }
            keys.into_iter().filter(|k| k != tag).collect()
        }
        _ => return None,
    };
    if keys.iter().any(|k| k == tag) {
        return None;
    }
    let b = keys.pop()?;
    let a = keys.pop()?;
    Some((a, b))
}

/// A pay-to-pubkey-hash output back to `sender`.
pub fn is_change_output(output: &Output, sender: &Entity) -> bool {
    output.recipient().as_ref() == Some(sender)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tir_chain::{Input, Script};
    use tir_crypto::public_from_private;
    use tir_types::{Outpoint, PrivateKey};

    fn key(n: u8) -> PublicKey {
        public_from_private(&PrivateKey([n; 32])).unwrap()
    }

    fn entity(n: u8) -> Entity {
        derive_entity(&key(n))
    }

    fn spend_from(n: u8) -> Input {
        let mut input = Input::from_outpoint(Outpoint::new(TxHash::new([0xaa; 32]), n as u32));
        let signature = [0x30u8; 71];
        input.script = Script::from_pushes(&[&signature[..], key(n).as_bytes()]);
        input
    }

    fn trust(keys: &[PublicKey], value: u64) -> Output {
        Output::new(value, Script::multisig(1, keys).unwrap())
    }

    fn change(n: u8, value: u64) -> Output {
        Output::pay_to(&entity(n), value).unwrap()
    }

    fn increase_of(tx: &Transaction) -> Option<DirectTrust> {
        parse_increase(&TrustLedger::new(), tx, tx.hash())
    }

    #[test]
    fn untagged_increase() {
        let tx = Transaction::new(vec![spend_from(1)], vec![trust(&[key(1), key(2)], 50)]);
        let edge = increase_of(&tx).unwrap();
        assert_eq!(edge.origin, key(1));
        assert_eq!(edge.dest, key(2));
        assert_eq!(edge.amount, 50);
        assert_eq!(edge.output_index(), Some(0));
    }

    #[test]
    fn tagged_increase_in_either_order() {
        let tag = tag_key().clone();
        for keys in [
            vec![key(1), key(2), tag.clone()],
            vec![key(2), key(1), tag.clone()],
        ] {
            let tx = Transaction::new(vec![spend_from(1)], vec![trust(&keys, 50)]);
            let edge = increase_of(&tx).unwrap();
            assert_eq!(edge.origin, key(1));
            assert_eq!(edge.dest, key(2));
        }
    }

    #[test]
    fn increase_with_change() {
        let tx = Transaction::new(
            vec![spend_from(1)],
            vec![change(1, 10), trust(&[key(1), key(2)], 40)],
        );
        let edge = increase_of(&tx).unwrap();
        assert_eq!(edge.amount, 40);
        assert_eq!(edge.output_index(), Some(1));
    }

    #[test]
    fn rejected_increase_shapes() {
        let two_inputs = Transaction::new(
            vec![spend_from(1), spend_from(1)],
            vec![trust(&[key(1), key(2)], 40)],
        );
        let two_trusts = Transaction::new(
            vec![spend_from(1)],
            vec![trust(&[key(1), key(2)], 40), trust(&[key(1), key(3)], 40)],
        );
        let foreign_second = Transaction::new(
            vec![spend_from(1)],
            vec![trust(&[key(1), key(2)], 40), change(3, 10)],
        );
        let two_changes = Transaction::new(vec![spend_from(1)], vec![change(1, 1), change(1, 2)]);
        let same_party = Transaction::new(vec![spend_from(1)], vec![trust(&[key(1), key(1)], 40)]);
        let not_sender = Transaction::new(vec![spend_from(1)], vec![trust(&[key(2), key(3)], 40)]);
        let three_outputs = Transaction::new(
            vec![spend_from(1)],
            vec![trust(&[key(1), key(2)], 40), change(1, 1), change(1, 2)],
        );
        let zero = Transaction::new(vec![spend_from(1)], vec![trust(&[key(1), key(2)], 0)]);
        for tx in [
            two_inputs,
            two_trusts,
            foreign_second,
            two_changes,
            same_party,
            not_sender,
            three_outputs,
            zero,
        ] {
            assert!(increase_of(&tx).is_none());
        }
    }

    #[test]
    fn unsigned_input_has_no_sender() {
        let input = Input::from_outpoint(Outpoint::new(TxHash::new([0xaa; 32]), 0));
        let tx = Transaction::new(vec![input], vec![trust(&[key(1), key(2)], 40)]);
        assert!(increase_of(&tx).is_none());
    }

    #[test]
    fn two_of_two_is_not_trust() {
        let output = Output::new(5, Script::multisig(2, &[key(1), key(2)]).unwrap());
        assert!(parse_trust_output(&output, 0, TxHash::ZERO, &entity(1)).is_none());
    }

    #[test]
    fn three_keys_without_tag_is_not_trust() {
        let output = trust(&[key(1), key(2), key(3)], 5);
        assert!(parse_trust_output(&output, 0, TxHash::ZERO, &entity(1)).is_none());
    }

    #[test]
    fn change_output_must_pay_sender() {
        assert!(is_change_output(&change(1, 5), &entity(1)));
        assert!(!is_change_output(&change(2, 5), &entity(1)));
        assert!(!is_change_output(&trust(&[key(1), key(2)], 5), &entity(1)));
    }

    #[test]
    fn unrelated_transaction_yields_nothing() {
        let tx = Transaction::new(vec![spend_from(1)], vec![change(2, 5)]);
        let edges = classify(&TrustLedger::new(), &tx, tx.hash()).unwrap();
        assert!(edges.is_empty());
    }
}
