//! Plain records for persisting features and sets

use fabric::{
    FabricError, Fault, Feature, FeatureKind, FeatureRecord, FeatureSet, Foliation, Lineation, Pair,
    SetRecord, Vector3,
};

#[test]
fn test_feature_roundtrip() {
    let l = Lineation::new(212.0, 37.0);
    assert_eq!(Lineation::from_record(&l.to_record()).unwrap(), l);

    let s = Foliation::new(45.0, 80.0);
    assert_eq!(Foliation::from_record(&s.to_record()).unwrap(), s);

    let v = Vector3::new(0.2, -0.4, 1.5);
    assert_eq!(Vector3::from_record(&v.to_record()).unwrap(), v);

    let p = Pair::new(120.0, 40.0, 66.0, 30.0).unwrap();
    assert_eq!(Pair::from_record(&p.to_record()).unwrap(), p);
}

#[test]
fn test_fault_keeps_sense() {
    for sense in [1, -1] {
        let f = Fault::new(300.0, 50.0, 250.0, 37.0, sense).unwrap();
        let rec = f.to_record();
        assert!(matches!(rec, FeatureRecord::Fault { sense: s, .. } if s == sense));
        let back = Fault::from_record(&rec).unwrap();
        assert_eq!(back, f);
        assert_eq!(back.sense(), sense);
    }
}

#[test]
fn test_wrong_record_type() {
    let rec = Lineation::new(10.0, 10.0).to_record();
    assert!(matches!(Foliation::from_record(&rec), Err(FabricError::TypeMismatch(_))));
    assert!(matches!(Fault::from_record(&rec), Err(FabricError::TypeMismatch(_))));
}

#[test]
fn test_set_json_roundtrip() {
    let set = FeatureSet::<Foliation>::from_geo(&[10.0, 120.0, 250.0], &[20.0, 45.0, 85.0])
        .unwrap()
        .with_name("bedding");
    let json = serde_json::to_string(&set.to_record()).unwrap();
    assert!(json.contains(r#""datatype":"Foliation""#));

    let rec: SetRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(rec.datatype, FeatureKind::Foliation);
    let back = FeatureSet::<Foliation>::from_records(&rec).unwrap();
    assert_eq!(back.name(), "bedding");
    assert_eq!(back, set);
}

#[test]
fn test_set_type_is_checked() {
    let rec = FeatureSet::new(vec![Lineation::new(1.0, 2.0)]).to_record();
    assert!(matches!(
        FeatureSet::<Foliation>::from_records(&rec),
        Err(FabricError::TypeMismatch(_))
    ));
}

#[test]
fn test_set_record_without_name() {
    let json = r#"{
        "datatype": "Lineation",
        "collection": [
            {"datatype": "Lineation", "azi": 120.0, "inc": 30.0},
            {"datatype": "Lineation", "azi": 300.0, "inc": 10.0}
        ]
    }"#;
    let rec: SetRecord = serde_json::from_str(json).unwrap();
    let set = FeatureSet::<Lineation>::from_records(&rec).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set.name(), "");
    assert_eq!(set[1], Lineation::new(300.0, 10.0));
}
