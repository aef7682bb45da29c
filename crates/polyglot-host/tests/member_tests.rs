//! Name-based access through discovered members
//!
//! A write to a final field and a write to a field that does not exist must
//! be indistinguishable to guest code.

use std::sync::Arc;

use polyglot_host::host::{FieldSpec, HostClass, HostType, HostValue};
use polyglot_host::{DeploymentMode, HostClassMembers, InteropError, MemberCache};

fn account_class() -> Arc<HostClass> {
    HostClass::builder("Account")
        .field(FieldSpec::new("ID", HostType::Long).public().as_final().initial(7i64))
        .field(FieldSpec::new("balance", HostType::Double).public())
        .field(FieldSpec::new("owner", HostType::String).public())
        .field(FieldSpec::new("pin", HostType::Int))
        .build()
}

#[test]
fn test_final_and_missing_look_the_same() {
    for mode in [DeploymentMode::Aot, DeploymentMode::Jit] {
        let class = account_class();
        let members = HostClassMembers::discover_with(&class, mode);
        let obj = HostValue::Object(class.instantiate());

        let final_err = members.write(&obj, "ID", HostValue::Long(1)).unwrap_err();
        let missing_err = members.write(&obj, "id", HostValue::Long(1)).unwrap_err();
        let hidden_err = members.write(&obj, "pin", HostValue::Int(1)).unwrap_err();

        assert!(matches!(final_err, InteropError::UnknownIdentifier(ref n) if n == "ID"));
        assert!(matches!(missing_err, InteropError::UnknownIdentifier(ref n) if n == "id"));
        assert!(matches!(hidden_err, InteropError::UnknownIdentifier(ref n) if n == "pin"));
        assert_eq!(members.read(&obj, "ID").unwrap(), HostValue::Long(7));
    }
}

#[test]
fn test_read_write_by_name() {
    for mode in [DeploymentMode::Aot, DeploymentMode::Jit] {
        let class = account_class();
        let members = HostClassMembers::discover_with(&class, mode);
        let obj = HostValue::Object(class.instantiate());

        members.write(&obj, "balance", HostValue::Double(10.5)).unwrap();
        members.write(&obj, "owner", HostValue::from("ada")).unwrap();
        assert_eq!(members.read(&obj, "balance").unwrap(), HostValue::Double(10.5));
        assert_eq!(members.read(&obj, "owner").unwrap(), HostValue::from("ada"));

        let err = members.write(&obj, "balance", HostValue::from("lots")).unwrap_err();
        assert!(matches!(err, InteropError::UnsupportedType { .. }));
        assert_eq!(members.read(&obj, "balance").unwrap(), HostValue::Double(10.5));
    }
}

#[test]
fn test_cache_is_per_class() {
    let cache = MemberCache::with_mode(DeploymentMode::Jit);
    let a = account_class();
    let b = account_class();

    let ma = cache.lookup(&a);
    let mb = cache.lookup(&b);
    assert!(!Arc::ptr_eq(&ma, &mb));
    assert_eq!(cache.len(), 2);
    assert_eq!(ma.class().id(), a.id());
    assert_eq!(
        mb.field_names().collect::<Vec<_>>(),
        vec!["ID", "balance", "owner"]
    );
}
