use swale_model::{Field, FieldType, FeatureClass, Schema};
use swale_store::{is_scratch_active, Overwrite, ScratchWorkspace};

#[test]
fn scratch_names_are_unique() {
    let a = ScratchWorkspace::new();
    let b = ScratchWorkspace::new();
    assert_ne!(a.name(), b.name());
    assert!(a.name().starts_with("scratch_"));
}

#[test]
fn scratch_registration_released_on_drop() {
    let name;
    {
        let mut scratch = ScratchWorkspace::new();
        name = scratch.name().to_string();
        assert!(is_scratch_active(&name));

        let schema = Schema::new(vec![Field::new("Acres_calc", FieldType::Double)]).unwrap();
        let sect = FeatureClass::table("sect_result", schema).unwrap();
        scratch.insert(sect, Overwrite::Deny).unwrap();
        assert_eq!(scratch.len(), 1);
    }
    assert!(!is_scratch_active(&name));
}

#[test]
fn scratch_released_even_when_an_operation_bails_early() {
    fn failing_step(scratch: &ScratchWorkspace) -> Result<(), String> {
        let _ = scratch.name();
        Err("locked dataset".to_string())
    }

    let name;
    let result = {
        let scratch = ScratchWorkspace::new();
        name = scratch.name().to_string();
        failing_step(&scratch)
    };
    assert!(result.is_err());
    assert!(!is_scratch_active(&name));
}
