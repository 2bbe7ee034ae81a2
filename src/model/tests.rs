use super::*;
use std::collections::BTreeMap;

fn sample(attrs: &[(&str, &str)]) -> Sample {
    Sample {
        id: 1,
        experiment_id: 1,
        name: "s1.mzXML".to_string(),
        control: false,
        attributes: attrs
            .iter()
            .map(|(k, v)| SampleAttribute::new(*k, *v))
            .collect(),
    }
}

#[test]
fn test_ion_mode_parsing() {
    assert_eq!("pos".parse::<IonMode>(), Ok(IonMode::Positive));
    assert_eq!(" NEG ".parse::<IonMode>(), Ok(IonMode::Negative));
    assert_eq!("negative".parse::<IonMode>(), Ok(IonMode::Negative));
    assert!("both".parse::<IonMode>().is_err());
    assert_eq!(IonMode::Negative.to_string(), "neg");
    assert_eq!(IonMode::default(), IonMode::Positive);
}

#[test]
fn test_ion_mode_serde_tags() {
    let json = serde_json::to_string(&IonMode::Negative).unwrap();
    assert_eq!(json, "\"neg\"");
    let mode: IonMode = serde_json::from_str("\"pos\"").unwrap();
    assert_eq!(mode, IonMode::Positive);
}

#[test]
fn test_group_key_missing_attributes() {
    let s = sample(&[("media", "LB"), ("time", "24h")]);
    let names = vec!["time".to_string(), "strain".to_string()];
    let key = s.group_key(&names);
    assert_eq!(key.values(), &[Some("24h".to_string()), None]);

    let empty = s.group_key(&[]);
    assert!(empty.is_empty());
    assert_eq!(empty, GroupKey::default());
}

#[test]
fn test_matches_any_forbidden_pair() {
    let s = sample(&[("media", "LB")]);
    let mut forbidden = BTreeMap::new();
    assert!(!s.matches_any(&forbidden));

    forbidden.insert("media".to_string(), "M9".to_string());
    assert!(!s.matches_any(&forbidden));

    forbidden.insert("media".to_string(), "LB".to_string());
    assert!(s.matches_any(&forbidden));
}

#[test]
fn test_peak_means_ignore_non_positive() {
    let means = PeakMeans::from_observations(vec![
        (true, 0.0),
        (true, 10.0),
        (true, 30.0),
        (false, 50.0),
        (false, -1.0),
    ]);
    assert_eq!(means.control, Some(20.0));
    assert_eq!(means.treatment, Some(50.0));
    assert!(means.present_in_controls());

    let none = PeakMeans::from_observations(vec![(true, 0.0), (false, 5.0)]);
    assert_eq!(none.control, None);
    assert!(!none.present_in_controls());
}
