//! Builders for trust-changing transactions.

use tir_chain::{Coin, CoinSource, MutableTransaction, Output, Script};
use tir_crypto::{derive_entity, hash160, public_from_private};
use tir_types::{Entity, Outpoint, PrivateKey, PublicKey};
use tracing::{debug, info};

use crate::engine::TrustEngine;
use crate::TrustError;

/// Who signs a trust decrease.
///
/// The truster normally withdraws its own trust. Since the shared output is
/// 1-of-n, the trusted party can also spend it: stealing keeps the edge's
/// origin and destination but signs with the destination's key.
pub enum DecreaseAuthority<'a> {
    Origin {
        origin: &'a PrivateKey,
        dest: &'a PublicKey,
    },
    Steal {
        origin: &'a PublicKey,
        dest: &'a PrivateKey,
    },
}

impl DecreaseAuthority<'_> {
    /// `(origin, dest, signer)`.
    fn resolve(&self) -> Result<(PublicKey, PublicKey, &PrivateKey), TrustError> {
        match self {
            Self::Origin { origin, dest } => {
                Ok((public_from_private(origin)?, (*dest).clone(), *origin))
            }
            Self::Steal { origin, dest } => {
                Ok(((*origin).clone(), public_from_private(dest)?, *dest))
            }
        }
    }
}

impl<C: CoinSource> TrustEngine<C> {
    /// Build a transaction moving `amount` of the coin at `source` into trust
    /// from `origin` to `dest`. The rest, less `fee`, returns to `origin`.
    pub async fn build_increase_tx(
        &self,
        origin: &PrivateKey,
        dest: &PublicKey,
        source: Outpoint,
        amount: u64,
        fee: Option<u64>,
    ) -> Result<MutableTransaction, TrustError> {
        check_increase(origin, dest, amount)?;
        let coin = self
            .coins
            .coin(&source)
            .await?
            .ok_or(TrustError::CoinNotFound(source))?;
        self.build_increase_from_coin(origin, dest, source, coin, amount, fee)
    }

    /// [`TrustEngine::build_increase_tx`] for a coin the caller has already
    /// looked up.
    pub fn build_increase_from_coin(
        &self,
        origin: &PrivateKey,
        dest: &PublicKey,
        source: Outpoint,
        coin: Coin,
        amount: u64,
        fee: Option<u64>,
    ) -> Result<MutableTransaction, TrustError> {
        let fee = fee.unwrap_or(self.options.default_fee);
        let (origin_key, origin_entity) = check_increase(origin, dest, amount)?;
        let needed = amount.saturating_add(fee);
        if needed > coin.value {
            return Err(TrustError::InsufficientFunds {
                needed,
                available: coin.value,
            });
        }

        let trust_script = self.options.output_variant.trust_script(&origin_key, dest)?;
        let mut mtx = MutableTransaction::with_outputs(vec![Output::new(amount, trust_script)]);
        let change = coin.value - needed;
        if change > 0 {
            mtx.add_output(Output::new(
                change,
                Script::pubkey_hash(&hash160(origin_key.as_bytes())),
            ));
        }

        mtx.add_coin(source, coin.clone());
        if !mtx.script_template(0, &coin.script, &origin_key)? {
            return Err(TrustError::Signing(format!(
                "{} cannot unlock coin {}",
                origin_entity, source
            )));
        }
        let signed = mtx.sign(origin)?;
        if signed != 1 {
            return Err(TrustError::Signing(format!(
                "expected one signed input, signed {}",
                signed
            )));
        }

        info!(
            origin = %origin_entity,
            dest = %derive_entity(dest),
            source = %source,
            amount,
            change,
            "built trust increase"
        );
        Ok(mtx)
    }

    /// Build the transactions withdrawing `amount` of trust, one per consumed
    /// edge, in the order the edges were recorded. Each pays what it
    /// withdraws, less `fee`, to `payee` (the origin by default) and keeps
    /// any remainder in trust.
    ///
    /// Every coin spent here backs a recorded edge, so no lookup is needed.
    pub async fn build_decrease_txs(
        &self,
        authority: DecreaseAuthority<'_>,
        amount: u64,
        payee: Option<&Entity>,
        fee: Option<u64>,
    ) -> Result<Vec<MutableTransaction>, TrustError> {
        let fee = fee.unwrap_or(self.options.default_fee);
        let (origin, dest, signer) = authority.resolve()?;
        let origin_entity = derive_entity(&origin);
        let dest_entity = derive_entity(&dest);
        if origin_entity == dest_entity {
            return Err(TrustError::SelfTrust(origin_entity));
        }
        if amount == 0 {
            return Err(TrustError::ZeroAmount);
        }

        let available = self
            .ledger
            .direct_trust(&origin_entity, &dest_entity)
            .finite()
            .unwrap_or(u64::MAX);
        if available < amount {
            return Err(TrustError::InsufficientTrust {
                needed: amount,
                available,
            });
        }
        let payee = payee.unwrap_or(&origin_entity);

        let mut remaining = amount;
        let mut txs = Vec::new();
        for (_, edge) in self.ledger.spendable_direct_trusts(&origin_entity, &dest_entity) {
            let take = remaining.min(edge.amount);
            if take == 0 {
                continue;
            }
            remaining -= take;

            let (Some(outpoint), Some(script)) = (edge.outpoint(), edge.script()) else {
                return Err(TrustError::InvariantViolation(format!(
                    "spendable trust from tx {} has no output",
                    edge.tx_hash
                )));
            };
            let coin = Coin::new(edge.amount, script.clone());

            let mut mtx =
                MutableTransaction::with_outputs(vec![Output::pay_to(payee, take.saturating_sub(fee))?]);
            let residual = edge.amount - take;
            if residual > 0 {
                mtx.add_output(Output::new(residual, script.clone()));
            }

            mtx.add_coin(outpoint, coin.clone());
            if !mtx.script_template(0, script, &edge.origin)? {
                return Err(TrustError::Signing(format!(
                    "no template for trust output {}",
                    outpoint
                )));
            }
            if !mtx.sign_input(0, &coin, signer)? {
                return Err(TrustError::Signing(format!(
                    "signer cannot spend trust output {}",
                    outpoint
                )));
            }

            debug!(prev = %outpoint, take, residual, "built trust decrease");
            txs.push(mtx);
        }

        info!(
            origin = %origin_entity,
            dest = %dest_entity,
            amount,
            txs = txs.len(),
            "built trust decreases"
        );
        Ok(txs)
    }
}

/// Origin key and entity of a valid increase request.
fn check_increase(
    origin: &PrivateKey,
    dest: &PublicKey,
    amount: u64,
) -> Result<(PublicKey, Entity), TrustError> {
    let origin_key = public_from_private(origin)?;
    let origin_entity = derive_entity(&origin_key);
    if origin_entity == derive_entity(dest) {
        return Err(TrustError::SelfTrust(origin_entity));
    }
    if amount == 0 {
        return Err(TrustError::ZeroAmount);
    }
    Ok((origin_key, origin_entity))
}
