//! Typed access to the two record namespaces.
//!
//! Lands live under `land/<AssetID>` and deeds under `deed/<DeedID>`, so a
//! scan of one namespace never decodes a record of the other.

use serde::de::DeserializeOwned;
use serde::Serialize;

use landreg_core::{AssetId, DeedId, RecordBytes};
use landreg_ledger::LedgerStub;

use crate::deed::Deed;
use crate::error::RegistryError;
use crate::land::Land;

/// Key namespace of a record kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Land,
    Deed,
}

impl Namespace {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Land => "land/",
            Self::Deed => "deed/",
        }
    }

    /// World-state key of record `id`.
    pub fn key(&self, id: &str) -> String {
        format!("{}{id}", self.prefix())
    }

    /// Half-open range covering every key in the namespace.
    pub fn range(&self) -> (String, String) {
        let prefix = self.prefix();
        // '0' is the byte after '/'.
        let end = format!("{}0", &prefix[..prefix.len() - 1]);
        (prefix.to_string(), end)
    }
}

fn load<T, C>(ctx: &mut C, ns: Namespace, id: &str) -> Result<Option<T>, RegistryError>
where
    T: DeserializeOwned,
    C: LedgerStub + ?Sized,
{
    let key = ns.key(id);
    match ctx.get_state(&key)? {
        None => Ok(None),
        Some(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| RegistryError::Serialization { key, source }),
    }
}

fn store<T, C>(ctx: &mut C, ns: Namespace, id: &str, record: &T) -> Result<(), RegistryError>
where
    T: Serialize,
    C: LedgerStub + ?Sized,
{
    let bytes = RecordBytes::new(record)?;
    ctx.put_state(&ns.key(id), bytes.into_vec())?;
    Ok(())
}

pub fn load_land<C: LedgerStub + ?Sized>(
    ctx: &mut C,
    id: &AssetId,
) -> Result<Option<Land>, RegistryError> {
    load(ctx, Namespace::Land, id.as_str())
}

/// Load a land or fail with `NotFound`.
pub fn require_land<C: LedgerStub + ?Sized>(
    ctx: &mut C,
    id: &AssetId,
) -> Result<Land, RegistryError> {
    load_land(ctx, id)?.ok_or_else(|| RegistryError::NotFound(format!("land {id}")))
}

pub fn land_exists<C: LedgerStub + ?Sized>(
    ctx: &mut C,
    id: &AssetId,
) -> Result<bool, RegistryError> {
    Ok(ctx.get_state(&Namespace::Land.key(id.as_str()))?.is_some())
}

pub fn store_land<C: LedgerStub + ?Sized>(ctx: &mut C, land: &Land) -> Result<(), RegistryError> {
    store(ctx, Namespace::Land, land.asset_id.as_str(), land)
}

pub fn load_deed<C: LedgerStub + ?Sized>(
    ctx: &mut C,
    id: &DeedId,
) -> Result<Option<Deed>, RegistryError> {
    if id.is_empty() {
        return Ok(None);
    }
    load(ctx, Namespace::Deed, id.as_str())
}

pub fn deed_exists<C: LedgerStub + ?Sized>(
    ctx: &mut C,
    id: &DeedId,
) -> Result<bool, RegistryError> {
    if id.is_empty() {
        return Ok(false);
    }
    Ok(ctx.get_state(&Namespace::Deed.key(id.as_str()))?.is_some())
}

pub fn store_deed<C: LedgerStub + ?Sized>(ctx: &mut C, deed: &Deed) -> Result<(), RegistryError> {
    store(ctx, Namespace::Deed, deed.deed_id.as_str(), deed)
}

/// Delete a deed, failing with `NotFound` if it is not on record.
pub fn delete_deed<C: LedgerStub + ?Sized>(
    ctx: &mut C,
    id: &DeedId,
) -> Result<(), RegistryError> {
    if !deed_exists(ctx, id)? {
        return Err(RegistryError::NotFound(format!("deed {id:?}")));
    }
    ctx.del_state(&Namespace::Deed.key(id.as_str()))?;
    Ok(())
}

/// Every land on record, in key order.
pub fn scan_lands<C: LedgerStub + ?Sized>(ctx: &mut C) -> Result<Vec<Land>, RegistryError> {
    let (start, end) = Namespace::Land.range();
    ctx.get_state_by_range(&start, &end)?
        .into_iter()
        .map(|kv| {
            serde_json::from_slice(&kv.value)
                .map_err(|source| RegistryError::Serialization { key: kv.key, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::land::{Owner, ParcelDetails};
    use landreg_core::Nid;
    use landreg_ledger::{MemoryLedger, StaticIdentity};

    fn land(dag_no: i64) -> Land {
        Land::new_application(
            ParcelDetails {
                dag_no,
                district: "Dhaka".into(),
                division: "Dhaka".into(),
                khatian_no: 7,
                mouza: "X".into(),
                upazila: "Y".into(),
                nec: String::new(),
                pay_tx: "tx".into(),
            },
            Owner::new("A", Nid(1)),
        )
    }

    #[test]
    fn test_namespace_keys() {
        assert_eq!(Namespace::Land.key("abc"), "land/abc");
        assert_eq!(Namespace::Deed.key("17abc"), "deed/17abc");
        assert_eq!(
            Namespace::Land.range(),
            ("land/".to_string(), "land0".to_string())
        );
    }

    #[test]
    fn test_store_then_load() {
        let ledger = MemoryLedger::new();
        let l = land(1);
        let mut tx = ledger.begin(StaticIdentity::new("Org3MSP")).unwrap();
        store_land(&mut tx, &l).unwrap();
        tx.commit().unwrap();

        let mut tx = ledger.begin(StaticIdentity::new("Org3MSP")).unwrap();
        assert_eq!(load_land(&mut tx, &l.asset_id).unwrap(), Some(l.clone()));
        assert!(land_exists(&mut tx, &l.asset_id).unwrap());
        assert!(load_land(&mut tx, &AssetId::new("missing")).unwrap().is_none());
        assert!(matches!(
            require_land(&mut tx, &AssetId::new("missing")),
            Err(RegistryError::NotFound(_))
        ));
    }

    #[test]
    fn test_scan_skips_deeds() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin(StaticIdentity::new("Org3MSP")).unwrap();
        let a = land(1);
        let b = land(2);
        store_land(&mut tx, &a).unwrap();
        store_land(&mut tx, &b).unwrap();
        let deed = Deed::snapshot_of(&a, DeedId::new("99x"));
        store_deed(&mut tx, &deed).unwrap();
        tx.commit().unwrap();

        let mut tx = ledger.begin(StaticIdentity::new("Org3MSP")).unwrap();
        let lands = scan_lands(&mut tx).unwrap();
        assert_eq!(lands, vec![a, b]);
    }

    #[test]
    fn test_stored_bytes_keep_declared_field_order() {
        let ledger = MemoryLedger::new();
        let mut l = land(12);
        l.owner_name = "Rahim & Sons <Ltd>".into();
        let mut tx = ledger.begin(StaticIdentity::new("Org3MSP")).unwrap();
        store_land(&mut tx, &l).unwrap();
        tx.commit().unwrap();

        let stored = ledger.get("land/12dhakadhaka7xy").unwrap();
        let expected = concat!(
            r#"{"AssetID":"12dhakadhaka7xy","Authenticators":[],"Comment":"","DagNo":12,"#,
            r#""DeedID":"","District":"Dhaka","Division":"Dhaka","KhatianNo":7,"Mouza":"X","#,
            r#""NEC":"","OwnerName":"Rahim \u0026 Sons \u003cLtd\u003e","OwnerNID":1,"#,
            r#""PayTx":"tx","Status":"pending","Upazila":"Y"}"#
        );
        assert_eq!(std::str::from_utf8(&stored).unwrap(), expected);
    }

    #[test]
    fn test_malformed_record_reports_key() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin(StaticIdentity::new("Org3MSP")).unwrap();
        tx.put_state("land/bad", b"{\"AssetID\":1}".to_vec()).unwrap();
        tx.commit().unwrap();

        let mut tx = ledger.begin(StaticIdentity::new("Org3MSP")).unwrap();
        match scan_lands(&mut tx) {
            Err(RegistryError::Serialization { key, .. }) => assert_eq!(key, "land/bad"),
            other => panic!("expected serialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_delete_absent_deed_fails() {
        let ledger = MemoryLedger::new();
        let mut tx = ledger.begin(StaticIdentity::new("Org3MSP")).unwrap();
        assert!(matches!(
            delete_deed(&mut tx, &DeedId::empty()),
            Err(RegistryError::NotFound(_))
        ));
        assert!(matches!(
            delete_deed(&mut tx, &DeedId::new("nope")),
            Err(RegistryError::NotFound(_))
        ));
    }
}
