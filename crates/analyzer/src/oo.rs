//! Structural relationship classification over one file's classes and
//! import table.
//!
//! Pure functions throughout: no I/O, no session state. Every predicate
//! works from syntax-level evidence; an annotation that cannot be
//! resolved (`any`, `unknown`, absent) never produces an edge.

use crate::types::{Cardinality, DependencyInfo, RelationKind, ResolvedTypeInfo};
use relmap_ast::type_name;
use relmap_ast::{ClassInfo, ImportInfo, Visibility};
use std::collections::HashMap;

/// Full output of [`analyze`]
#[derive(Debug, Clone, Default)]
pub struct OoAnalysis {
    /// All edges, in extractor order
    pub relationships: Vec<DependencyInfo>,
    pub compositions: Vec<DependencyInfo>,
    pub aggregations: Vec<DependencyInfo>,
    pub associations: Vec<DependencyInfo>,
    pub dependencies: Vec<DependencyInfo>,
    pub injections: Vec<DependencyInfo>,

    /// Base class name → subclass names, single inheritance only.
    /// Interface implementation is recorded per class, not here.
    pub inheritance: HashMap<String, Vec<String>>,
}

/// Classify a raw type annotation against the file's import table.
///
/// Returns `None` for absent, `any` and `unknown` annotations; the
/// classifiers treat that as "no evidence" and emit nothing.
pub fn resolve_type_info(
    annotation: Option<&str>,
    imports: &[ImportInfo],
) -> Option<ResolvedTypeInfo> {
    let annotation = annotation?.trim();
    if annotation.is_empty() || annotation == "any" || annotation == "unknown" {
        return None;
    }

    let (base, is_array) = type_name::strip_array(annotation);
    let (name, generic_args) = type_name::split_generic(&base);
    let import = imports.iter().find(|import| import.provides(&name));

    Some(ResolvedTypeInfo {
        is_primitive: type_name::is_primitive(&name),
        is_class_type: type_name::is_class_like(&name),
        is_interface_type: type_name::is_interface_like(&name),
        is_external: import.is_some(),
        source_module: import.map(|import| import.source.clone()),
        type_name: name,
        is_array,
        generic_args,
    })
}

/// Run every extractor in fixed order and collect the results
pub fn analyze(classes: &[ClassInfo], imports: &[ImportInfo]) -> OoAnalysis {
    let mut analysis = OoAnalysis {
        compositions: extract_compositions(classes, imports),
        aggregations: extract_aggregations(classes, imports),
        associations: extract_associations(classes, imports),
        dependencies: extract_dependencies(classes, imports),
        injections: extract_injections(classes, imports),
        inheritance: build_inheritance_map(classes),
        relationships: Vec::new(),
    };

    analysis.relationships.extend(analysis.compositions.iter().cloned());
    analysis.relationships.extend(analysis.aggregations.iter().cloned());
    analysis.relationships.extend(analysis.associations.iter().cloned());
    analysis.relationships.extend(analysis.dependencies.iter().cloned());
    analysis.relationships.extend(analysis.injections.iter().cloned());

    log::debug!(
        "Classified {} relationships across {} classes",
        analysis.relationships.len(),
        classes.len()
    );
    analysis
}

/// Class-typed, non-array property that is private or instance-bound:
/// the owner controls the part's lifecycle.
pub fn extract_compositions(classes: &[ClassInfo], imports: &[ImportInfo]) -> Vec<DependencyInfo> {
    let mut edges = Vec::new();
    for class in classes {
        for property in &class.properties {
            let Some(info) = resolve_type_info(property.type_annotation.as_deref(), imports)
            else {
                continue;
            };
            if !info.is_class_type || info.is_array {
                continue;
            }
            if property.visibility == Visibility::Private || !property.is_static {
                edges.push(property_edge(
                    class,
                    property.name.as_str(),
                    property.line_number,
                    &info,
                    RelationKind::Composition,
                    Some(Cardinality::One),
                ));
            }
        }
    }
    edges
}

/// Class-typed array property, any visibility: an owned collection
pub fn extract_aggregations(classes: &[ClassInfo], imports: &[ImportInfo]) -> Vec<DependencyInfo> {
    let mut edges = Vec::new();
    for class in classes {
        for property in &class.properties {
            let Some(info) = resolve_type_info(property.type_annotation.as_deref(), imports)
            else {
                continue;
            };
            if info.is_class_type && info.is_array {
                edges.push(property_edge(
                    class,
                    property.name.as_str(),
                    property.line_number,
                    &info,
                    RelationKind::Aggregation,
                    Some(Cardinality::Many),
                ));
            }
        }
    }
    edges
}

/// Public, class-typed, non-array property not already claimed by
/// composition. Composition covers every private or non-static property,
/// so only public static properties land here; a property never yields
/// two conflicting ownership edges.
pub fn extract_associations(classes: &[ClassInfo], imports: &[ImportInfo]) -> Vec<DependencyInfo> {
    let mut edges = Vec::new();
    for class in classes {
        for property in &class.properties {
            let Some(info) = resolve_type_info(property.type_annotation.as_deref(), imports)
            else {
                continue;
            };
            if !info.is_class_type || info.is_array {
                continue;
            }
            let claimed_by_composition =
                property.visibility == Visibility::Private || !property.is_static;
            if property.visibility == Visibility::Public && !claimed_by_composition {
                edges.push(property_edge(
                    class,
                    property.name.as_str(),
                    property.line_number,
                    &info,
                    RelationKind::Association,
                    Some(Cardinality::One),
                ));
            }
        }
    }
    edges
}

/// Class types appearing in a method's parameter list or return type.
/// One edge per distinct target type per method.
pub fn extract_dependencies(classes: &[ClassInfo], imports: &[ImportInfo]) -> Vec<DependencyInfo> {
    let mut edges = Vec::new();
    for class in classes {
        for method in &class.methods {
            let mut seen = Vec::new();
            let annotations = method
                .parameters
                .iter()
                .filter_map(|param| param.type_annotation.as_deref())
                .chain(method.return_type.as_deref());

            for annotation in annotations {
                let Some(info) = resolve_type_info(Some(annotation), imports) else {
                    continue;
                };
                if !info.is_class_type || seen.contains(&info.type_name) {
                    continue;
                }
                seen.push(info.type_name.clone());
                edges.push(DependencyInfo {
                    from: class.name.clone(),
                    to: info.type_name.clone(),
                    kind: RelationKind::Dependency,
                    cardinality: None,
                    line_number: method.line_number,
                    context: method.signature(),
                    is_external: info.is_external,
                    source_module: info.source_module.clone(),
                });
            }
        }
    }
    edges
}

/// Class-typed constructor parameters: dependencies supplied from outside
pub fn extract_injections(classes: &[ClassInfo], imports: &[ImportInfo]) -> Vec<DependencyInfo> {
    let mut edges = Vec::new();
    for class in classes {
        for param in &class.constructor_params {
            let Some(info) = resolve_type_info(param.type_annotation.as_deref(), imports) else {
                continue;
            };
            if !info.is_class_type {
                continue;
            }
            let annotation = param.type_annotation.as_deref().unwrap_or_default();
            edges.push(DependencyInfo {
                from: class.name.clone(),
                to: info.type_name.clone(),
                kind: RelationKind::Injection,
                cardinality: None,
                line_number: class.line_number,
                context: format!("constructor({}: {})", param.name, annotation),
                is_external: info.is_external,
                source_module: info.source_module,
            });
        }
    }
    edges
}

/// Base class name → subclasses, from `extends` only
pub fn build_inheritance_map(classes: &[ClassInfo]) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for class in classes {
        if let Some(base) = &class.extends {
            let subclasses = map.entry(base.clone()).or_default();
            if !subclasses.contains(&class.name) {
                subclasses.push(class.name.clone());
            }
        }
    }
    map
}

fn property_edge(
    class: &ClassInfo,
    property_name: &str,
    line_number: usize,
    info: &ResolvedTypeInfo,
    kind: RelationKind,
    cardinality: Option<Cardinality>,
) -> DependencyInfo {
    let suffix = if info.is_array { "[]" } else { "" };
    DependencyInfo {
        from: class.name.clone(),
        to: info.type_name.clone(),
        kind,
        cardinality,
        line_number,
        context: format!("{property_name}: {}{suffix}", info.type_name),
        is_external: info.is_external,
        source_module: info.source_module.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relmap_ast::{ClassKind, MethodInfo, ParameterInfo, PropertyInfo};

    fn property(
        name: &str,
        annotation: &str,
        visibility: Visibility,
        is_static: bool,
    ) -> PropertyInfo {
        let (base, is_array) = type_name::strip_array(annotation);
        PropertyInfo {
            name: name.to_string(),
            type_annotation: Some(annotation.to_string()),
            visibility,
            is_array,
            is_class_type: type_name::annotation_is_class_type(&base),
            is_static,
            line_number: 3,
        }
    }

    fn class_with(properties: Vec<PropertyInfo>) -> ClassInfo {
        ClassInfo {
            properties,
            ..ClassInfo::new("Owner", ClassKind::Class, 1)
        }
    }

    fn import_of(name: &str, source: &str) -> ImportInfo {
        let mut import = ImportInfo::new(source, 1);
        import.push_specifier(name);
        import
    }

    #[test]
    fn test_resolve_type_info() {
        let imports = vec![import_of("User", "../models/User")];

        let info = resolve_type_info(Some("User[]"), &imports).unwrap();
        assert_eq!(info.type_name, "User");
        assert!(info.is_array);
        assert!(info.is_class_type);
        assert!(info.is_external);
        assert_eq!(info.source_module.as_deref(), Some("../models/User"));

        let local = resolve_type_info(Some("Session"), &imports).unwrap();
        assert!(!local.is_external);
        assert_eq!(local.source_module, None);

        let primitive = resolve_type_info(Some("string"), &imports).unwrap();
        assert!(primitive.is_primitive);
        assert!(!primitive.is_class_type);

        let interface = resolve_type_info(Some("IUserRepo"), &imports).unwrap();
        assert!(interface.is_interface_type);

        let generic = resolve_type_info(Some("Map<string, User>"), &imports).unwrap();
        assert_eq!(generic.type_name, "Map");
        assert!(!generic.is_class_type);
        assert_eq!(generic.generic_args, vec!["string", "User"]);
    }

    #[test]
    fn test_unresolved_annotations_yield_nothing() {
        assert!(resolve_type_info(None, &[]).is_none());
        assert!(resolve_type_info(Some("any"), &[]).is_none());
        assert!(resolve_type_info(Some("unknown"), &[]).is_none());
        assert!(resolve_type_info(Some("  "), &[]).is_none());
    }

    #[test]
    fn test_private_property_is_composition_only() {
        let classes = vec![class_with(vec![property(
            "user",
            "User",
            Visibility::Private,
            false,
        )])];
        let analysis = analyze(&classes, &[]);

        assert_eq!(analysis.compositions.len(), 1);
        assert_eq!(analysis.aggregations.len(), 0);
        assert_eq!(analysis.associations.len(), 0);

        let edge = &analysis.compositions[0];
        assert_eq!(edge.from, "Owner");
        assert_eq!(edge.to, "User");
        assert_eq!(edge.cardinality, Some(Cardinality::One));
        assert_eq!(edge.context, "user: User");
    }

    #[test]
    fn test_public_array_is_aggregation_only() {
        let classes = vec![class_with(vec![property(
            "items",
            "Item[]",
            Visibility::Public,
            false,
        )])];
        let analysis = analyze(&classes, &[]);

        assert_eq!(analysis.aggregations.len(), 1);
        assert_eq!(analysis.compositions.len(), 0);
        assert_eq!(
            analysis.aggregations[0].cardinality,
            Some(Cardinality::Many)
        );
        assert_eq!(analysis.aggregations[0].context, "items: Item[]");
    }

    #[test]
    fn test_public_instance_property_resolves_to_composition() {
        // Both the composition and association predicates match a public,
        // non-static, class-typed property; composition wins.
        let classes = vec![class_with(vec![property(
            "profile",
            "Profile",
            Visibility::Public,
            false,
        )])];
        let analysis = analyze(&classes, &[]);
        assert_eq!(analysis.compositions.len(), 1);
        assert_eq!(analysis.associations.len(), 0);
    }

    #[test]
    fn test_public_static_property_is_association() {
        let classes = vec![class_with(vec![property(
            "registry",
            "Registry",
            Visibility::Public,
            true,
        )])];
        let analysis = analyze(&classes, &[]);
        assert_eq!(analysis.compositions.len(), 0);
        assert_eq!(analysis.associations.len(), 1);
        assert_eq!(analysis.associations[0].kind, RelationKind::Association);
    }

    #[test]
    fn test_primitive_properties_make_no_edges() {
        let classes = vec![class_with(vec![
            property("name", "string", Visibility::Private, false),
            property("tags", "string[]", Visibility::Public, false),
        ])];
        let analysis = analyze(&classes, &[]);
        assert!(analysis.relationships.is_empty());
    }

    #[test]
    fn test_method_dependency() {
        let mut class = class_with(vec![]);
        class.methods.push(MethodInfo {
            name: "save".to_string(),
            parameters: vec![
                ParameterInfo {
                    name: "user".to_string(),
                    type_annotation: Some("User".to_string()),
                    visibility: None,
                },
                ParameterInfo {
                    name: "copy".to_string(),
                    type_annotation: Some("User".to_string()),
                    visibility: None,
                },
            ],
            return_type: Some("Receipt".to_string()),
            visibility: Visibility::Public,
            line_number: 7,
        });

        let analysis = analyze(&[class], &[]);
        let targets: Vec<&str> = analysis
            .dependencies
            .iter()
            .map(|edge| edge.to.as_str())
            .collect();
        // One edge per distinct target type per method
        assert_eq!(targets, vec!["User", "Receipt"]);
        assert_eq!(
            analysis.dependencies[0].context,
            "save(user: User, copy: User): Receipt"
        );
    }

    #[test]
    fn test_constructor_injection() {
        let mut class = class_with(vec![]);
        class.constructor_params = vec![
            ParameterInfo {
                name: "repo".to_string(),
                type_annotation: Some("UserRepo".to_string()),
                visibility: Some(Visibility::Private),
            },
            ParameterInfo {
                name: "limit".to_string(),
                type_annotation: Some("number".to_string()),
                visibility: None,
            },
        ];
        let imports = vec![import_of("UserRepo", "./UserRepo")];

        let analysis = analyze(&[class], &imports);
        assert_eq!(analysis.injections.len(), 1);
        let edge = &analysis.injections[0];
        assert_eq!(edge.to, "UserRepo");
        assert_eq!(edge.kind, RelationKind::Injection);
        assert!(edge.is_external);
        assert_eq!(edge.context, "constructor(repo: UserRepo)");
    }

    #[test]
    fn test_inheritance_map() {
        let mut admin = ClassInfo::new("Admin", ClassKind::Class, 1);
        admin.extends = Some("User".to_string());
        let mut guest = ClassInfo::new("Guest", ClassKind::Class, 5);
        guest.extends = Some("User".to_string());
        let plain = ClassInfo::new("Report", ClassKind::Class, 9);

        let map = build_inheritance_map(&[admin, guest, plain]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["User"], vec!["Admin", "Guest"]);
    }

    #[test]
    fn test_relationship_order() {
        let mut class = class_with(vec![
            property("part", "Engine", Visibility::Private, false),
            property("wheels", "Wheel[]", Visibility::Public, false),
        ]);
        class.constructor_params = vec![ParameterInfo {
            name: "engine".to_string(),
            type_annotation: Some("Engine".to_string()),
            visibility: None,
        }];

        let analysis = analyze(&[class], &[]);
        let kinds: Vec<RelationKind> = analysis
            .relationships
            .iter()
            .map(|edge| edge.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                RelationKind::Composition,
                RelationKind::Aggregation,
                RelationKind::Injection
            ]
        );
    }
}
