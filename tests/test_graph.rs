use demes_resolver::{SizeFunction, TimeUnits};

#[test]
fn tutorial_example_03() {
    let yaml = "
time_units: generations
demes:
  - name: A
    epochs:
      - start_size: 1000
";
    let g = demes_resolver::loads(yaml).unwrap();
    assert_eq!(g.num_demes(), 1);
    assert_eq!(
        f64::from(g.get_deme("A").unwrap().start_time()),
        f64::INFINITY,
    );
}

#[test]
fn replacement_with_size_change() {
    let yaml = "
time_units: generations
demes:
  - name: A
    epochs:
      - start_size: 1000
        end_time: 1000
  - name: B
    ancestors: [A]
    epochs:
      - start_size: 2000
";
    let g = demes_resolver::loads(yaml).unwrap();
    assert_eq!(g.num_demes(), 2);
    assert_eq!(g.demes().len(), 2);

    for d in g.demes() {
        if d.name() == "A" {
            assert_eq!(d.num_ancestors(), 0);
        } else {
            assert_eq!(d.num_ancestors(), 1);
            assert_eq!(d.start_time(), 1000.0);

            for ancestor in d.ancestors() {
                assert_eq!(ancestor.name(), "A");
                assert_eq!(ancestor.proportion(), 1.0);
                // ancestors refer back into the graph by index
                let deme = g.get_deme(ancestor.index().unwrap()).unwrap();
                assert_eq!(deme.name(), ancestor.name());
                assert_eq!(deme.num_ancestors(), 0);
            }

            assert!(d.ancestor_names().all(|ancestor| ancestor == "A"));
        }
    }
}

#[test]
fn default_epoch_sizes() {
    let yaml = "
time_units: generations
defaults:
  epoch:
    start_size: 1000
demes:
  - name: A
";
    let g = demes_resolver::loads(yaml).unwrap();
    assert_eq!(g.num_demes(), 1);
    assert_eq!(g.get_deme(0).unwrap().name(), "A");
    assert_eq!(g.get_deme("A").unwrap().end_size().unwrap(), 1000.0);
}

#[test]
fn lookup_by_name_and_index() {
    let yaml = "
demes:
  - name: A
    epochs:
      - start_size: 1000
  - name: B
    epochs:
      - start_size: 1000
";
    let g = demes_resolver::loads(yaml).unwrap();
    assert_eq!(g.deme_index("B"), Some(1));
    assert!(g.get_deme("C").is_none());
    assert!(g.get_deme(2).is_none());
    assert_eq!(&*g.deme_names(), &["A", "B"]);
}

#[test]
fn years_with_generation_time() {
    let yaml = "
time_units: years
generation_time: 25
demes:
  - name: A
    epochs:
      - start_size: 1000
        end_time: 25000
      - start_size: 500
        end_size: 2000
";
    let g = demes_resolver::loads(yaml).unwrap();
    assert_eq!(g.time_units(), TimeUnits::Years);
    assert_eq!(g.generation_time(), 25.0);
    let a = g.get_deme("A").unwrap();
    assert_eq!(a.num_epochs(), 2);
    assert_eq!(a.get_epoch(1).unwrap().start_time(), 25000.0);
    assert_eq!(
        a.get_epoch(1).unwrap().size_function(),
        SizeFunction::Exponential
    );
    assert!(a.get_epoch(2).is_none());
}

#[test]
fn custom_time_units() {
    let yaml = "
time_units: ticks
generation_time: 3
demes:
  - name: A
    epochs:
      - start_size: 1000
";
    let g = demes_resolver::loads(yaml).unwrap();
    assert_eq!(g.time_units(), TimeUnits::Custom("ticks".to_string()));
    let canonical = g.as_string().unwrap();
    assert!(canonical.contains("time_units: ticks"), "{canonical}");
}

#[test]
fn top_level_fields_are_kept() {
    let yaml = "
description: a model
doi:
  - https://doi.org/10.1000/1
  - https://doi.org/10.1000/2
metadata:
  author: someone
  tags: [a, b]
demes:
  - name: A
    epochs:
      - start_size: 1000
";
    let g = demes_resolver::loads(yaml).unwrap();
    assert_eq!(g.description(), Some("a model"));
    assert_eq!(g.doi().count(), 2);
    let metadata = g.metadata().unwrap();
    assert!(metadata.as_yaml_string().unwrap().contains("someone"));

    let again = demes_resolver::loads(&g.as_string().unwrap()).unwrap();
    assert_eq!(g, again);
}

#[test]
fn display_is_canonical_yaml() {
    let yaml = "
demes:
  - name: A
    epochs:
      - start_size: 1000
";
    let g = demes_resolver::loads(yaml).unwrap();
    assert_eq!(format!("{g}"), g.as_string().unwrap());
}
