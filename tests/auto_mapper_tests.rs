//! Auto-mapper tests against the fixture schema

use mapping_navigator::SchemaGraph;
use mapping_navigator::auto_mapper::{
    AutoMapper, AutoMapperConfig, AutoMapperError, MatchMethod, auto_map,
};
use mapping_navigator::field_spec::encode;
use mapping_navigator::mapping_path::{MappingPath, mapping_path};
use mapping_navigator::navigator::{NavigatorOptions, navigate};

fn schema() -> SchemaGraph {
    SchemaGraph::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/schema.json"))
        .unwrap()
}

fn path(segments: &[&str]) -> MappingPath {
    mapping_path(segments)
}

mod matching_tests {
    use super::*;

    #[test]
    fn test_nearest_table_wins() {
        let schema = schema();
        let headers = [
            "Cat #",
            "Field Number",
            "Remarks",
            "Start Date",
            "Latitude",
            "Locality",
            "Unknown Column",
        ];
        let result = auto_map(&schema, &headers, "CollectionObject").unwrap();

        assert_eq!(result.path_for("Cat #"), Some(&path(&["catalogNumber"])));
        assert_eq!(result.path_for("Field Number"), Some(&path(&["fieldNumber"])));
        assert_eq!(result.path_for("Remarks"), Some(&path(&["remarks"])));
        assert_eq!(
            result.path_for("Start Date"),
            Some(&path(&["collectingEvent", "startDate"]))
        );
        assert_eq!(
            result.path_for("Latitude"),
            Some(&path(&["collectingEvent", "locality", "latitude1"]))
        );
        assert_eq!(
            result.path_for("Locality"),
            Some(&path(&["collectingEvent", "locality", "localityName"]))
        );
        assert_eq!(result.unmapped, vec!["Unknown Column"]);
        assert!(!result.is_complete());
    }

    #[test]
    fn test_match_methods() {
        let schema = schema();
        let headers = ["Cat #", "Field Number", "Current", "Room or Building"];
        let result = auto_map(&schema, &headers, "CollectionObject").unwrap();
        assert_eq!(
            result.get("Cat #").unwrap().match_method,
            MatchMethod::Definition
        );
        assert_eq!(
            result.get("Field Number").unwrap().match_method,
            MatchMethod::FieldName
        );

        let current = result.get("Current").unwrap();
        assert_eq!(current.mapping_path, path(&["determinations", "#1", "isCurrent"]));
        assert_eq!(current.match_method, MatchMethod::Label);

        let room = result.get("Room or Building").unwrap();
        assert_eq!(
            room.mapping_path,
            path(&["cataloger", "addresses", "#1", "roomOrBuilding"])
        );
        assert_eq!(room.match_method, MatchMethod::FieldName);
        assert!(result.is_complete());
    }

    #[test]
    fn test_definitions_win_over_labels() {
        let schema = schema();
        let result = auto_map(&schema, &["Count"], "CollectionObject").unwrap();
        let count = result.get("Count").unwrap();
        assert_eq!(count.mapping_path, path(&["preparations", "#1", "countAmt"]));
        assert_eq!(count.match_method, MatchMethod::Definition);
    }

    #[test]
    fn test_formatted_entry_is_never_matched() {
        let schema = schema();
        let result = auto_map(&schema, &["Formatted", "-formatted"], "CollectionObject").unwrap();
        assert!(result.mappings.is_empty());
        assert_eq!(result.unmapped, vec!["Formatted", "-formatted"]);
    }

    #[test]
    fn test_rank_headers() {
        let schema = schema();
        let headers = ["Genus", "Species", "Author", "Common Name"];
        let result = auto_map(&schema, &headers, "Taxon").unwrap();

        let genus = result.get("Genus").unwrap();
        assert_eq!(genus.mapping_path, path(&["$Genus", "name"]));
        assert_eq!(genus.match_method, MatchMethod::RankName);
        assert_eq!(result.path_for("Species"), Some(&path(&["$Species", "name"])));
        assert_eq!(result.path_for("Author"), Some(&path(&["$-any", "author"])));
        assert_eq!(
            result.path_for("Common Name"),
            Some(&path(&["$-any", "commonName"]))
        );
        assert!(result.is_complete());
    }

    #[test]
    fn test_rank_headers_through_relationships() {
        let schema = schema();
        let result = auto_map(&schema, &["Family"], "CollectionObject").unwrap();
        assert_eq!(
            result.path_for("Family"),
            Some(&path(&["determinations", "#1", "taxon", "$Family", "name"]))
        );
    }
}

mod uniqueness_tests {
    use super::*;

    #[test]
    fn test_to_many_index_is_bumped() {
        let schema = schema();
        let headers = ["Determined Date 1", "Determined Date 2", "Determined Date 3"];
        let result = auto_map(&schema, &headers, "CollectionObject").unwrap();

        let paths: Vec<&MappingPath> = headers
            .iter()
            .map(|header| result.path_for(header).unwrap())
            .collect();
        assert_eq!(
            paths,
            vec![
                &path(&["determinations", "#1", "determinedDate"]),
                &path(&["determinations", "#2", "determinedDate"]),
                &path(&["determinations", "#3", "determinedDate"]),
            ]
        );
    }

    #[test]
    fn test_duplicate_without_to_many_is_left_unmapped() {
        let schema = schema();
        let result = auto_map(&schema, &["Catalog Number", "Cat No"], "CollectionObject").unwrap();
        assert_eq!(result.path_for("Catalog Number"), Some(&path(&["catalogNumber"])));
        assert_eq!(result.unmapped, vec!["Cat No"]);
    }

    #[test]
    fn test_every_path_is_unique() {
        let schema = schema();
        let headers = [
            "Cat #",
            "Catalog Number",
            "Remarks",
            "Notes",
            "Determined Date",
            "Date Determined",
            "Start Date",
            "Collected",
        ];
        let result = auto_map(&schema, &headers, "CollectionObject").unwrap();

        let mut paths = result.mapped_paths();
        let count = paths.len();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), count);
    }

    #[test]
    fn test_repeated_and_empty_headers() {
        let schema = schema();
        let result = auto_map(&schema, &["", " #1 ", "Remarks", "Remarks"], "CollectionObject")
            .unwrap();
        assert_eq!(result.mappings.len(), 1);
        assert_eq!(result.unmapped, vec!["", " #1 "]);
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_depth_limits_search() {
        let schema = schema();
        let headers = ["Cat #", "Start Date", "Latitude"];

        let shallow = AutoMapper::new(&schema, AutoMapperConfig::new().with_depth(0))
            .unwrap()
            .map(&headers, "CollectionObject")
            .unwrap();
        assert_eq!(shallow.unmapped, vec!["Start Date", "Latitude"]);

        let one_hop = AutoMapper::new(&schema, AutoMapperConfig::new().with_depth(1))
            .unwrap()
            .map(&headers, "CollectionObject")
            .unwrap();
        assert_eq!(one_hop.unmapped, vec!["Latitude"]);
    }

    #[test]
    fn test_label_matching_disabled() {
        let schema = schema();
        let config = AutoMapperConfig::new().with_match_labels(false);
        let result = AutoMapper::new(&schema, config)
            .unwrap()
            .map(&["Cat #", "Field Number"], "CollectionObject")
            .unwrap();
        assert_eq!(result.path_for("Cat #"), Some(&path(&["catalogNumber"])));
        assert_eq!(result.unmapped, vec!["Field Number"]);
    }

    #[test]
    fn test_definitions_from_toml() {
        let schema = schema();
        let config = AutoMapperConfig::from_toml_str(
            r#"
depth = 1

[definitions.CollectingEvent.remarks]
string = ["habitat"]
"#,
        )
        .unwrap();
        let mapper = AutoMapper::new(&schema, config).unwrap();
        assert_eq!(mapper.config().depth, 1);

        let result = mapper.map(&["Habitat", "Cat #"], "CollectionObject").unwrap();
        let habitat = result.get("Habitat").unwrap();
        assert_eq!(habitat.mapping_path, path(&["collectingEvent", "remarks"]));
        assert_eq!(habitat.match_method, MatchMethod::Definition);
        assert_eq!(result.unmapped, vec!["Cat #"]);
    }

    #[test]
    fn test_unknown_base_table() {
        let schema = schema();
        assert!(matches!(
            auto_map(&schema, &["Cat #"], "Specimen"),
            Err(AutoMapperError::UnknownTable(name)) if name == "Specimen"
        ));
    }
}

mod integration_tests {
    use super::*;

    #[test]
    fn test_mapped_paths_encode() {
        let schema = schema();
        let headers = ["Cat #", "Determined Date", "Latitude", "Genus"];
        let result = auto_map(&schema, &headers, "CollectionObject").unwrap();
        assert!(result.is_complete());

        let string_ids: Vec<String> = result
            .mappings
            .iter()
            .map(|mapping| {
                encode(&schema, "CollectionObject", &mapping.mapping_path)
                    .unwrap()
                    .string_id
            })
            .collect();
        assert_eq!(
            string_ids,
            vec![
                "1.collectionobject.catalogNumber",
                "1,9-determinations.determination.determinedDate",
                "1,10,2.locality.latitude1",
                "1,9-determinations,4.taxon.Genus Name",
            ]
        );
    }

    #[test]
    fn test_mapped_paths_disable_navigator_fields() {
        let schema = schema();
        let result = auto_map(&schema, &["Cat #", "Remarks"], "CollectionObject").unwrap();
        let options = NavigatorOptions::default().with_mapped_paths(result.mapped_paths());
        let navigation = navigate(&schema, "CollectionObject", &[], &options).unwrap();

        let step = &navigation.steps[0];
        assert!(!step.child("catalogNumber").unwrap().enabled);
        assert!(!step.child("remarks").unwrap().enabled);
        assert!(step.child("fieldNumber").unwrap().enabled);
    }
}
