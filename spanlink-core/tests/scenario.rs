use std::collections::HashSet;

use spanlink_core::{
    Annotator, AnnotatorConfig, Change, IdScheme, Intent, Label, LabelId, Mode, Source, TextId,
};

fn config() -> AnnotatorConfig {
    AnnotatorConfig {
        entity_labels: vec![Label::new("PERSON"), Label::new("PLACE")],
        relationship_labels: vec![Label::new("MET"), Label::new("LIVES_IN")],
        id_scheme: IdScheme::Sequential,
        ..AnnotatorConfig::default()
    }
}

fn step(annotator: Annotator, intent: Intent) -> (Annotator, Option<Change>) {
    let transition = annotator.dispatch(intent).unwrap();
    (transition.annotator, transition.change)
}

fn label(annotator: Annotator, from: usize, to: usize, label: &str) -> (Annotator, Option<Change>) {
    let (a, _) = step(annotator, Intent::HighlightRange { from, to });
    step(a, Intent::SelectLabel { label: label.into() })
}

fn assert_integrity(annotator: &Annotator) {
    let ids: HashSet<&TextId> = annotator.sequence().iter().map(|u| &u.text_id).collect();
    for rel in annotator.relationships() {
        assert!(ids.contains(&rel.from) && ids.contains(&rel.to), "dangling {:?}", rel);
    }
}

#[test]
fn test_john_met_mary() {
    let a = Annotator::from_document(config(), "John met Mary");
    let texts: Vec<&str> = a.sequence().iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, vec!["John", " ", "met", " ", "Mary"]);

    let (a, change) = label(a, 0, 0, "PERSON");
    assert!(change.is_some());
    assert_eq!(a.sequence().len(), 5);
    assert_eq!(a.sequence()[0].text, "John");
    assert_eq!(a.sequence()[0].label, Some(LabelId::from("PERSON")));

    let (a, _) = label(a, 4, 4, "PERSON");
    let john = a.sequence()[0].text_id.clone();
    let mary = a.sequence()[4].text_id.clone();

    let (a, change) = step(a, Intent::SetMode { mode: Mode::Relationships });
    assert!(change.is_none());
    let (a, _) = step(a, Intent::BeginPair { text_id: john.clone() });
    let (a, change) = step(a, Intent::CompletePair { text_id: mary.clone() });
    assert!(change.is_none());

    let shown = a.display_relationships();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].temp);
    assert_eq!((&shown[0].from, &shown[0].to), (&john, &mary));

    let (a, change) = step(a, Intent::SelectLabel { label: "MET".into() });
    let change = change.unwrap();
    assert_eq!(change.relationships.len(), 1);
    assert!(!change.relationships[0].temp);
    assert_eq!(change.relationships[0].label, LabelId::from("MET"));
    assert_eq!(Some(&change.relationships[0].color), a.colors().get(&"MET".into()));

    let (a, _) = step(a, Intent::SetMode { mode: Mode::Entities });
    let (a, change) = step(a, Intent::RemoveLabel { index: 0 });
    let change = change.unwrap();
    assert!(change.relationships.is_empty());
    assert!(a.relationships().is_empty());
    assert_eq!(a.sequence()[0].text, "John");
    assert!(!a.sequence()[0].is_labeled());
}

#[test]
fn test_reconcile_superset_keeps_annotations() {
    let a = Annotator::from_document(config(), "John met Mary");
    let (a, _) = label(a, 0, 0, "PERSON");
    let (a, _) = label(a, 4, 4, "PERSON");
    let john = a.sequence()[0].clone();
    let mary = a.sequence()[4].clone();

    let (a, _) = step(a, Intent::ToggleMode);
    let (a, _) = step(a, Intent::BeginPair { text_id: john.text_id.clone() });
    let (a, _) = step(a, Intent::CompletePair { text_id: mary.text_id.clone() });
    let (a, _) = step(a, Intent::SelectLabel { label: "MET".into() });
    let (a, _) = step(a, Intent::ToggleMode);
    let (a, _) = step(a, Intent::HighlightRange { from: 2, to: 2 });

    let (a, change) = step(
        a,
        Intent::ReplaceSource {
            source: Source::Document("On Monday John met Mary in Paris.".into()),
        },
    );
    assert!(change.is_some());
    assert_eq!(a.text(), "On Monday John met Mary in Paris.");
    assert!(a.sequence().contains(&john));
    assert!(a.sequence().contains(&mary));
    assert_eq!(a.relationships().len(), 1);
    assert_eq!(a.selection().highlighted(), None);
    assert_integrity(&a);
}

#[test]
fn test_merge_prunes_relationships_to_consumed_units() {
    let a = Annotator::from_document(config(), "New York is big");
    let new = a.sequence()[0].text_id.clone();
    let york = a.sequence()[2].text_id.clone();
    let big = a.sequence()[6].text_id.clone();

    // Unconstrained: relationships may join unlabeled units
    let (a, _) = step(a, Intent::ToggleMode);
    let (a, _) = step(a, Intent::BeginPair { text_id: york.clone() });
    let (a, _) = step(a, Intent::CompletePair { text_id: big.clone() });
    let (a, _) = step(a, Intent::SelectLabel { label: "LIVES_IN".into() });
    let (a, _) = step(a, Intent::BeginPair { text_id: new.clone() });
    let (a, _) = step(a, Intent::CompletePair { text_id: big });
    let (a, _) = step(a, Intent::SelectLabel { label: "MET".into() });
    assert_eq!(a.relationships().len(), 2);

    let (a, _) = step(a, Intent::ToggleMode);
    let (a, change) = label(a, 0, 2, "PLACE");
    let change = change.unwrap();

    assert_eq!(a.sequence()[0].text, "New York");
    assert_eq!(a.sequence()[0].text_id, new);
    // "York" was consumed, "New" lives on as the merged unit
    assert_eq!(change.relationships.len(), 1);
    assert_eq!(change.relationships[0].from, new);
    assert_integrity(&a);
}

#[test]
fn test_constrained_relationships_need_labels() {
    let mut cfg = config();
    cfg.constraint_relationships = true;
    let a = Annotator::from_document(cfg, "John met Mary");
    let met = a.sequence()[2].text_id.clone();

    let (a, _) = step(a, Intent::ToggleMode);
    let (a, _) = step(a, Intent::BeginPair { text_id: met });
    assert_eq!(a.selection().pending_first(), None);
}

#[test]
fn test_invalid_intents_leave_state_alone() {
    let a = Annotator::from_document(config(), "John met Mary");

    let (b, change) = step(a.clone(), Intent::SelectLabel { label: "PERSON".into() });
    assert!(change.is_none());
    assert_eq!(b.sequence(), a.sequence());

    let (b, change) = step(a.clone(), Intent::RemoveLabel { index: 1 });
    assert!(change.is_none());
    assert_eq!(b.sequence(), a.sequence());

    assert!(a.dispatch(Intent::RemoveLabel { index: 5 }).is_err());
    assert!(a.dispatch(Intent::HighlightRange { from: 0, to: 5 }).is_err());
}

mod random_sessions {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Step {
        Label(usize, usize, usize),
        Unlabel(usize),
        Link(usize, usize, usize),
        Unlink(usize),
        Grow(String, String),
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            (any::<usize>(), any::<usize>(), 0usize..2).prop_map(|(a, b, l)| Step::Label(a, b, l)),
            any::<usize>().prop_map(Step::Unlabel),
            (any::<usize>(), any::<usize>(), 0usize..2).prop_map(|(a, b, l)| Step::Link(a, b, l)),
            any::<usize>().prop_map(Step::Unlink),
            ("[a-z \n]{0,8}", "[a-z \n]{0,8}").prop_map(|(p, s)| Step::Grow(p, s)),
        ]
    }

    fn id_at(annotator: &Annotator, i: usize) -> TextId {
        let seq = annotator.sequence();
        seq[i % seq.len()].text_id.clone()
    }

    fn apply(annotator: Annotator, op: &Step) -> Annotator {
        let len = annotator.sequence().len().max(1);
        let intents = match op {
            Step::Label(a, b, l) => vec![
                Intent::SetMode { mode: Mode::Entities },
                Intent::HighlightRange { from: a % len, to: b % len },
                Intent::SelectLabel { label: ["PERSON", "PLACE"][*l].into() },
            ],
            Step::Unlabel(i) => vec![Intent::RemoveLabel { index: i % len }],
            Step::Link(a, b, l) => vec![
                Intent::SetMode { mode: Mode::Relationships },
                Intent::BeginPair { text_id: id_at(&annotator, *a) },
                Intent::CompletePair { text_id: id_at(&annotator, *b) },
                Intent::SelectLabel { label: ["MET", "LIVES_IN"][*l].into() },
            ],
            Step::Unlink(i) => {
                let count = annotator.relationships().len();
                if count == 0 {
                    vec![]
                } else {
                    vec![Intent::RemoveRelationship { index: i % count }]
                }
            }
            Step::Grow(prefix, suffix) => vec![Intent::ReplaceSource {
                source: Source::Document(format!("{}{}{}", prefix, annotator.text(), suffix)),
            }],
        };

        intents
            .into_iter()
            .fold(annotator, |a, intent| step(a, intent).0)
    }

    proptest! {
        /// Relationships never dangle, ids stay unique, and growing the text
        /// keeps every labeled unit
        #[test]
        fn random_edits_keep_integrity(
            text in "[a-z]{1,5}( [a-z]{1,5}){0,6}",
            steps in proptest::collection::vec(step_strategy(), 1..25),
        ) {
            let mut a = Annotator::from_document(config(), text);
            for s in &steps {
                let labeled: Vec<_> = a.sequence().iter().filter(|u| u.is_labeled()).cloned().collect();
                a = apply(a, s);

                assert_integrity(&a);
                let ids: HashSet<&TextId> = a.sequence().iter().map(|u| &u.text_id).collect();
                prop_assert_eq!(ids.len(), a.sequence().len());

                if let Step::Grow(..) = s {
                    for unit in &labeled {
                        prop_assert!(a.sequence().contains(unit), "lost {:?}", unit);
                    }
                }
            }
        }
    }
}
