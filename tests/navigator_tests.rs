//! Navigator tests against the fixture schema

use mapping_navigator::SchemaGraph;
use mapping_navigator::mapping_path::mapping_path;
use mapping_navigator::navigator::{
    ChildrenKind, NavigatorError, NavigatorOptions, PathBuildMode, navigate, navigate_with_mode,
};

fn schema() -> SchemaGraph {
    SchemaGraph::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/schema.json"))
        .unwrap()
}

mod step_tests {
    use super::*;

    #[test]
    fn test_base_table_children() {
        let schema = schema();
        let result = navigate(&schema, "CollectionObject", &[], &NavigatorOptions::default())
            .unwrap();

        assert_eq!(result.steps.len(), 1);
        let step = &result.steps[0];
        assert_eq!(step.kind, ChildrenKind::SimpleFields);
        assert_eq!(step.select_label, "Collection Object");
        assert_eq!(step.default_value, "0");
        assert!(step.default_child().is_none());

        let determinations = step.child("determinations").unwrap();
        assert!(determinations.is_relationship);
        assert_eq!(determinations.table_name, "Determination");
        let catalog_number = step.child("catalogNumber").unwrap();
        assert!(!catalog_number.is_relationship);
        assert_eq!(catalog_number.label, "Catalog Number");
    }

    #[test]
    fn test_step_per_position() {
        let schema = schema();
        let path = mapping_path(&["determinations", "#1", "taxon", "$Genus", "fullName"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        let kinds: Vec<(usize, &str, ChildrenKind)> = result
            .steps
            .iter()
            .map(|step| (step.position, step.table_name.as_str(), step.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (0, "CollectionObject", ChildrenKind::SimpleFields),
                (1, "Determination", ChildrenKind::ToMany),
                (2, "Determination", ChildrenKind::SimpleFields),
                (3, "Taxon", ChildrenKind::TreeRanks),
                (4, "Taxon", ChildrenKind::SimpleFields),
            ]
        );
        for (position, step) in result.steps.iter().enumerate() {
            assert_eq!(step.default_value, path[position]);
            assert_eq!(step.default_child().unwrap().name, path[position]);
        }
    }

    #[test]
    fn test_tree_ranks_in_order() {
        let schema = schema();
        let path = mapping_path(&["determinations", "#1", "taxon"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        let ranks = result.last_step().unwrap();
        assert_eq!(
            ranks.child_names(),
            vec![
                "$Kingdom", "$Phylum", "$Class", "$Order", "$Family", "$Genus", "$Species"
            ]
        );
        assert!(ranks.child("$Kingdom").unwrap().required);
        assert!(!ranks.child("$Species").unwrap().required);
    }

    #[test]
    fn test_any_rank_selected() {
        let schema = schema();
        let path = mapping_path(&["collectingEvent", "locality", "geography", "$-any"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        let ranks = result.step_at(3).unwrap();
        assert_eq!(ranks.child_names()[0], "$-any");
        assert!(ranks.child("$-any").unwrap().is_default);

        let fields = result.step_at(4).unwrap();
        assert_eq!(fields.kind, ChildrenKind::SimpleFields);
        assert!(fields.child("fullName").is_some());
    }

    #[test]
    fn test_bare_rank_is_rewritten() {
        let schema = schema();
        let path = mapping_path(&["preparations", "#1", "storage", "Cabinet", "fullName"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        assert_eq!(
            result.mapping_path,
            mapping_path(&["preparations", "#1", "storage", "$Cabinet", "fullName"])
        );
        assert_eq!(result.step_at(3).unwrap().default_value, "$Cabinet");
        assert_eq!(path[3], "Cabinet");
    }
}

mod default_tests {
    use super::*;
    use mapping_navigator::mapping_path::{EMPTY_SELECTION, FORMATTED_ENTRY};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Case {
        base_table: String,
        path: Vec<String>,
    }

    #[test]
    fn test_every_step_has_one_default() {
        let schema = schema();
        let cases: Vec<Case> =
            serde_json::from_str(include_str!("fixtures/field_specs.json")).unwrap();

        for case in cases {
            let result = navigate(
                &schema,
                &case.base_table,
                &case.path,
                &NavigatorOptions::default(),
            )
            .unwrap();
            for step in &result.steps {
                let defaults = step.children.iter().filter(|child| child.is_default).count();
                let expected = usize::from(step.default_value != EMPTY_SELECTION);
                assert_eq!(
                    defaults, expected,
                    "{:?} at position {} ('{}')",
                    case.path, step.position, step.default_value
                );
            }
        }
    }

    #[test]
    fn test_formatted_terminal_is_default() {
        let schema = schema();
        for path in [
            mapping_path(&[FORMATTED_ENTRY]),
            mapping_path(&["accession", FORMATTED_ENTRY]),
            mapping_path(&["determinations", "#1", "taxon", "$-any", FORMATTED_ENTRY]),
        ] {
            let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
                .unwrap();
            let step = result.last_step().unwrap();
            assert_eq!(step.position, path.len() - 1);
            assert_eq!(step.default_child().unwrap().name, FORMATTED_ENTRY);
        }
    }

    #[test]
    fn test_followed_back_reference_is_default() {
        let schema = schema();
        let path = mapping_path(&["rightSideRels", "#1", "leftSide", "catalogNumber"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();
        assert!(result.step_at(2).unwrap().child("leftSide").unwrap().is_default);
    }
}

mod exclusion_tests {
    use super::*;

    #[test]
    fn test_back_reference_is_excluded() {
        let schema = schema();
        let path = mapping_path(&["determinations", "#1"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        let determination = result.last_step().unwrap();
        assert!(determination.child("collectionObject").is_none());
        assert!(determination.child("taxon").is_some());
        assert!(determination.child("preferredTaxon").is_some());
    }

    #[test]
    fn test_back_reference_through_rank_is_excluded() {
        let schema = schema();
        let path = mapping_path(&["determinations", "#1", "taxon", "$-any"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        let taxon = result.last_step().unwrap();
        assert!(taxon.child("determinations").is_none());
        assert!(taxon.child("hybridParent2").is_some());
        assert!(taxon.child("definitionItem").is_some());
    }

    #[test]
    fn test_inverse_to_many_is_excluded() {
        let schema = schema();
        let path = mapping_path(&["collectingEvent"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        let event = result.last_step().unwrap();
        assert!(event.child("collectionObjects").is_none());
        assert!(event.child("collectors").is_some());
        assert!(event.child("locality").is_some());
    }

    #[test]
    fn test_nested_to_many_is_excluded() {
        let schema = schema();
        let path = mapping_path(&["preparations", "#1"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        let preparation = result.last_step().unwrap();
        assert!(preparation.child("giftPreparations").is_none());
        assert!(preparation.child("loanPreparations").is_none());
        assert!(preparation.child("prepType").is_some());
        assert!(preparation.child("storage").is_some());
    }

    #[test]
    fn test_hidden_fields() {
        let schema = schema();
        let visible = NavigatorOptions::default().with_hidden_fields(false);

        let result = navigate(&schema, "CollectionObject", &[], &visible).unwrap();
        assert!(result.steps[0].child("guid").is_none());
        assert!(result.steps[0].child("timestampModified").is_none());

        let path = mapping_path(&["timestampModified-month"]);
        let result = navigate(&schema, "CollectionObject", &path, &visible).unwrap();
        let step = &result.steps[0];
        assert!(step.child("timestampModified").unwrap().is_default);
        assert!(step.child("guid").is_none());
    }
}

mod to_many_tests {
    use super::*;

    #[test]
    fn test_add_slot_without_references() {
        let schema = schema();
        let path = mapping_path(&["determinations"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();

        let step = result.last_step().unwrap();
        assert_eq!(step.kind, ChildrenKind::ToMany);
        assert_eq!(step.child_names(), vec!["add"]);
        assert_eq!(step.default_value, "add");
        assert!(step.child("add").unwrap().is_default);
    }

    #[test]
    fn test_references_up_to_highest_index() {
        let schema = schema();
        let path = mapping_path(&["collectingEvent", "collectors", "#2"]);
        let mapped = vec![mapping_path(&[
            "collectingEvent",
            "collectors",
            "#4",
            "agent",
            "lastName",
        ])];
        let options = NavigatorOptions::default().with_mapped_paths(mapped);
        let result = navigate(&schema, "CollectionObject", &path, &options).unwrap();

        let step = result.step_at(2).unwrap();
        assert_eq!(step.child_names(), vec!["#1", "#2", "#3", "#4", "add"]);
        assert!(step.child("#2").unwrap().is_default);
    }

    #[test]
    fn test_mapped_fields_are_disabled() {
        let schema = schema();
        let mapped = vec![
            mapping_path(&["catalogNumber"]),
            mapping_path(&["collectingEvent", "remarks"]),
        ];
        let options = NavigatorOptions::default().with_mapped_paths(mapped);
        let path = mapping_path(&["collectingEvent"]);
        let result = navigate(&schema, "CollectionObject", &path, &options).unwrap();

        let base = result.step_at(0).unwrap();
        assert!(!base.child("catalogNumber").unwrap().enabled);
        assert!(base.child("remarks").unwrap().enabled);
        assert!(base.child("collectingEvent").unwrap().enabled);

        let event = result.step_at(1).unwrap();
        assert!(!event.child("remarks").unwrap().enabled);
        assert!(event.child("method").unwrap().enabled);
    }
}

mod mode_tests {
    use super::*;

    #[test]
    fn test_editor_stops_at_invalid_marker() {
        let schema = schema();
        let path = mapping_path(&["collectingEvent", "#1", "remarks"]);

        let strict =
            navigate_with_mode(&schema, "CollectionObject", &path, PathBuildMode::InteractiveEditor)
                .unwrap();
        assert_eq!(strict.steps.len(), 2);

        let lenient = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();
        assert_eq!(lenient.steps.len(), 3);
    }

    #[test]
    fn test_encode_mode_emits_no_steps() {
        let schema = schema();
        let path = mapping_path(&["determinations", "#1", "taxon", "Family", "fullName"]);
        let result =
            navigate_with_mode(&schema, "CollectionObject", &path, PathBuildMode::StringIdEncode)
                .unwrap();
        assert!(result.steps.is_empty());
        assert_eq!(result.mapping_path[3], "$Family");
    }

    #[test]
    fn test_probe_mode_describes_position_past_path() {
        let schema = schema();
        let path = mapping_path(&["collectingEvent", "locality"]);
        let result =
            navigate_with_mode(&schema, "CollectionObject", &path, PathBuildMode::AutoMapperProbe)
                .unwrap();
        assert_eq!(result.steps.len(), 1);
        let step = &result.steps[0];
        assert_eq!(step.position, 2);
        assert_eq!(step.table_name, "Locality");
        assert!(step.child("latitude1").is_some());
    }

    #[test]
    fn test_open_position() {
        let schema = schema();
        let path = mapping_path(&["accession", "accessionNumber"]);
        let options = NavigatorOptions::default().with_open_position(1);
        let result = navigate(&schema, "CollectionObject", &path, &options).unwrap();
        assert_eq!(result.open_step().unwrap().table_name, "Accession");
        assert_eq!(result.steps.iter().filter(|step| step.is_open).count(), 1);
    }

    #[test]
    fn test_errors() {
        let schema = schema();
        assert_eq!(
            navigate(&schema, "Specimen", &[], &NavigatorOptions::default()),
            Err(NavigatorError::UnknownTable("Specimen".to_string()))
        );

        let path = mapping_path(&["collectingEvent", "locality", "geography", "$Country"]);
        let options = NavigatorOptions::default().with_max_depth(3);
        assert_eq!(
            navigate(&schema, "CollectionObject", &path, &options),
            Err(NavigatorError::PathTooDeep {
                depth: 4,
                max_depth: 3
            })
        );
    }

    #[test]
    fn test_result_serializes() {
        let schema = schema();
        let path = mapping_path(&["determinations", "#1", "taxon"]);
        let result = navigate(&schema, "CollectionObject", &path, &NavigatorOptions::default())
            .unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["steps"][1]["kind"], "to_many");
        assert_eq!(json["steps"][3]["kind"], "tree_ranks");
        assert_eq!(json["mapping_path"][2], "taxon");
    }
}
