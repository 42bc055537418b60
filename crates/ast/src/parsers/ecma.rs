//! Shared walker for the TypeScript and JavaScript grammars.
//!
//! The two grammars share most node kinds; TypeScript adds type
//! annotations, accessibility modifiers, interfaces and parameter
//! properties. The walker matches both sets of kinds and simply never
//! sees the TS-only ones in a JavaScript tree.

use super::{line_of, node_text, unquote};
use crate::type_name;
use crate::types::{
    ClassInfo, ClassKind, FunctionInfo, ImportInfo, MethodInfo, ParameterInfo, PropertyInfo,
    UnifiedAst, Visibility,
};
use tree_sitter::Node;

/// Walk a parsed program into the unified shape
pub(crate) fn build_ast(mut ast: UnifiedAst, root: Node, source: &str) -> UnifiedAst {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        walk_top_level(&mut ast, child, source, false);
    }
    ast
}

fn walk_top_level(ast: &mut UnifiedAst, node: Node, source: &str, exported: bool) {
    match node.kind() {
        "import_statement" => {
            if let Some(import) = extract_import(node, source) {
                ast.imports.push(import);
            }
        }
        "export_statement" => extract_export(ast, node, source),
        "class_declaration" | "abstract_class_declaration" => {
            if let Some(class) = extract_class(node, source) {
                if exported {
                    ast.exports.push(class.name.clone());
                }
                ast.classes.push(class);
            }
        }
        "interface_declaration" => {
            if let Some(interface) = extract_interface(node, source) {
                if exported {
                    ast.exports.push(interface.name.clone());
                }
                ast.interfaces.push(interface);
            }
        }
        "function_declaration" | "generator_function_declaration" => {
            if let Some(function) = extract_function(node, source) {
                if exported {
                    ast.exports.push(function.name.clone());
                }
                ast.functions.push(function);
            }
        }
        "lexical_declaration" | "variable_declaration" => {
            extract_function_bindings(ast, node, source, exported);
        }
        "enum_declaration" | "type_alias_declaration" => {
            if exported {
                if let Some(name) = node.child_by_field_name("name") {
                    ast.exports.push(node_text(name, source).to_string());
                }
            }
        }
        _ => {}
    }
}

/// Unwrap `export ...` around a declaration or re-export clause
fn extract_export(ast: &mut UnifiedAst, node: Node, source: &str) {
    if let Some(declaration) = node.child_by_field_name("declaration") {
        walk_top_level(ast, declaration, source, true);
        return;
    }

    // export { A, B as C } [from '...']
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "export_clause" {
            let mut spec_cursor = child.walk();
            for spec in child.children(&mut spec_cursor) {
                if spec.kind() == "export_specifier" {
                    let name = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(name) = name {
                        ast.exports.push(node_text(name, source).to_string());
                    }
                }
            }
        }
    }
}

fn extract_import(node: Node, source: &str) -> Option<ImportInfo> {
    let source_node = node.child_by_field_name("source")?;
    let mut import = ImportInfo::new(unquote(node_text(source_node, source)), line_of(node));

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            // `import type { ... }`
            "type" => import.is_type_only = true,
            "import_clause" => {
                let mut clause_cursor = child.walk();
                for part in child.children(&mut clause_cursor) {
                    match part.kind() {
                        "identifier" => {
                            import.is_default = true;
                            import.push_specifier(node_text(part, source));
                        }
                        "named_imports" => {
                            let mut named_cursor = part.walk();
                            for spec in part.children(&mut named_cursor) {
                                if spec.kind() != "import_specifier" {
                                    continue;
                                }
                                // The local binding is the alias when present
                                let name = spec
                                    .child_by_field_name("alias")
                                    .or_else(|| spec.child_by_field_name("name"));
                                if let Some(name) = name {
                                    import.push_specifier(node_text(name, source));
                                }
                            }
                        }
                        "namespace_import" => {
                            import.is_namespace = true;
                            let mut ns_cursor = part.walk();
                            for ns_child in part.children(&mut ns_cursor) {
                                if ns_child.kind() == "identifier" {
                                    import.namespace_alias =
                                        Some(node_text(ns_child, source).to_string());
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    Some(import)
}

fn extract_class(node: Node, source: &str) -> Option<ClassInfo> {
    let name_node = node.child_by_field_name("name")?;
    let mut class = ClassInfo::new(
        node_text(name_node, source),
        ClassKind::Class,
        line_of(node),
    );

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "class_heritage" {
            extract_heritage(&mut class, child, source);
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        let mut body_cursor = body.walk();
        for member in body.children(&mut body_cursor) {
            match member.kind() {
                "method_definition" | "abstract_method_signature" => {
                    extract_method_into(&mut class, member, source);
                }
                "public_field_definition" | "field_definition" => {
                    if let Some(property) = extract_property(member, source) {
                        class.properties.push(property);
                    }
                }
                _ => {}
            }
        }
    }

    Some(class)
}

/// `extends`/`implements` clauses. The TypeScript grammar wraps them in
/// dedicated clause nodes; the JavaScript grammar puts the extended
/// expression directly under `class_heritage`.
fn extract_heritage(class: &mut ClassInfo, heritage: Node, source: &str) {
    let mut cursor = heritage.walk();
    for child in heritage.children(&mut cursor) {
        match child.kind() {
            "extends_clause" => {
                if let Some(name) = first_type_name(child, source) {
                    class.extends = Some(name);
                }
            }
            "implements_clause" => {
                let mut impl_cursor = child.walk();
                for ty in child.named_children(&mut impl_cursor) {
                    if let Some(name) = type_base_name(ty, source) {
                        class.implements.push(name);
                    }
                }
            }
            "identifier" | "member_expression" => {
                class.extends = Some(node_text(child, source).to_string());
            }
            _ => {}
        }
    }
}

fn first_type_name(node: Node, source: &str) -> Option<String> {
    let mut cursor = node.walk();
    let result = node
        .named_children(&mut cursor)
        .find_map(|child| type_base_name(child, source));
    result
}

/// Base name of a heritage type, generic arguments dropped
fn type_base_name(node: Node, source: &str) -> Option<String> {
    match node.kind() {
        "identifier" | "type_identifier" => Some(node_text(node, source).to_string()),
        "generic_type" => node
            .child_by_field_name("name")
            .map(|name| node_text(name, source).to_string()),
        "member_expression" | "nested_type_identifier" => {
            Some(node_text(node, source).to_string())
        }
        _ => None,
    }
}

fn extract_method_into(class: &mut ClassInfo, node: Node, source: &str) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source).to_string();
    let parameters = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(params, source))
        .unwrap_or_default();

    if name == "constructor" {
        class.constructor_params = parameters;
        return;
    }

    class.methods.push(MethodInfo {
        name,
        parameters,
        return_type: annotation_text(node.child_by_field_name("return_type"), source),
        visibility: accessibility_of(node, source),
        line_number: line_of(node),
    });
}

fn extract_property(node: Node, source: &str) -> Option<PropertyInfo> {
    let name_node = node.child_by_field_name("name")?;
    let type_annotation = annotation_text(node.child_by_field_name("type"), source);
    let (is_array, is_class_type) = classify_annotation(type_annotation.as_deref());

    Some(PropertyInfo {
        name: node_text(name_node, source).to_string(),
        type_annotation,
        visibility: accessibility_of(node, source),
        is_array,
        is_class_type,
        is_static: has_child_kind(node, "static"),
        line_number: line_of(node),
    })
}

fn extract_interface(node: Node, source: &str) -> Option<ClassInfo> {
    let name_node = node.child_by_field_name("name")?;
    let mut interface = ClassInfo::new(
        node_text(name_node, source),
        ClassKind::Interface,
        line_of(node),
    );

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "extends_type_clause" {
            let mut ext_cursor = child.walk();
            let mut bases = child
                .named_children(&mut ext_cursor)
                .filter_map(|ty| type_base_name(ty, source));
            interface.extends = bases.next();
            interface.implements.extend(bases);
        }
    }

    if let Some(body) = node.child_by_field_name("body") {
        let mut body_cursor = body.walk();
        for member in body.children(&mut body_cursor) {
            match member.kind() {
                "property_signature" => {
                    if let Some(name_node) = member.child_by_field_name("name") {
                        let type_annotation =
                            annotation_text(member.child_by_field_name("type"), source);
                        let (is_array, is_class_type) =
                            classify_annotation(type_annotation.as_deref());
                        interface.properties.push(PropertyInfo {
                            name: node_text(name_node, source).to_string(),
                            type_annotation,
                            visibility: Visibility::Public,
                            is_array,
                            is_class_type,
                            is_static: false,
                            line_number: line_of(member),
                        });
                    }
                }
                "method_signature" => {
                    if let Some(name_node) = member.child_by_field_name("name") {
                        interface.methods.push(MethodInfo {
                            name: node_text(name_node, source).to_string(),
                            parameters: member
                                .child_by_field_name("parameters")
                                .map(|params| extract_parameters(params, source))
                                .unwrap_or_default(),
                            return_type: annotation_text(
                                member.child_by_field_name("return_type"),
                                source,
                            ),
                            visibility: Visibility::Public,
                            line_number: line_of(member),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    Some(interface)
}

fn extract_function(node: Node, source: &str) -> Option<FunctionInfo> {
    let name_node = node.child_by_field_name("name")?;
    Some(FunctionInfo {
        name: node_text(name_node, source).to_string(),
        parameters: node
            .child_by_field_name("parameters")
            .map(|params| extract_parameters(params, source))
            .unwrap_or_default(),
        return_type: annotation_text(node.child_by_field_name("return_type"), source),
        is_async: has_child_kind(node, "async"),
        line_number: line_of(node),
    })
}

/// `const f = () => {}` and `const f = function () {}` count as top-level
/// functions
fn extract_function_bindings(ast: &mut UnifiedAst, node: Node, source: &str, exported: bool) {
    let mut cursor = node.walk();
    for declarator in node.named_children(&mut cursor) {
        if declarator.kind() != "variable_declarator" {
            continue;
        }
        let Some(name_node) = declarator.child_by_field_name("name") else {
            continue;
        };
        let Some(value) = declarator.child_by_field_name("value") else {
            continue;
        };
        if !matches!(
            value.kind(),
            "arrow_function" | "function_expression" | "function"
        ) {
            continue;
        }
        let function = FunctionInfo {
            name: node_text(name_node, source).to_string(),
            parameters: value
                .child_by_field_name("parameters")
                .map(|params| extract_parameters(params, source))
                .unwrap_or_default(),
            return_type: annotation_text(value.child_by_field_name("return_type"), source),
            is_async: has_child_kind(value, "async"),
            line_number: line_of(declarator),
        };
        if exported {
            ast.exports.push(function.name.clone());
        }
        ast.functions.push(function);
    }
}

fn extract_parameters(params: Node, source: &str) -> Vec<ParameterInfo> {
    let mut out = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            // TypeScript parameters, possibly parameter properties
            "required_parameter" | "optional_parameter" => {
                let Some(pattern) = param.child_by_field_name("pattern") else {
                    continue;
                };
                let visibility = if has_child_kind(param, "accessibility_modifier") {
                    Some(accessibility_of(param, source))
                } else {
                    None
                };
                out.push(ParameterInfo {
                    name: node_text(pattern, source).to_string(),
                    type_annotation: annotation_text(param.child_by_field_name("type"), source),
                    visibility,
                });
            }
            // Plain JavaScript parameters
            "identifier" => out.push(ParameterInfo {
                name: node_text(param, source).to_string(),
                type_annotation: None,
                visibility: None,
            }),
            "assignment_pattern" => {
                if let Some(left) = param.child_by_field_name("left") {
                    out.push(ParameterInfo {
                        name: node_text(left, source).to_string(),
                        type_annotation: None,
                        visibility: None,
                    });
                }
            }
            _ => {}
        }
    }
    out
}

/// Text of a `type_annotation` node without the leading `:`
fn annotation_text(node: Option<Node>, source: &str) -> Option<String> {
    let node = node?;
    let ty = node.named_child(0)?;
    Some(node_text(ty, source).to_string())
}

fn classify_annotation(annotation: Option<&str>) -> (bool, bool) {
    match annotation {
        Some(text) => {
            let (base, is_array) = type_name::strip_array(text);
            (is_array, type_name::annotation_is_class_type(&base))
        }
        None => (false, false),
    }
}

fn accessibility_of(node: Node, source: &str) -> Visibility {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "accessibility_modifier" {
            return match node_text(child, source) {
                "private" => Visibility::Private,
                "protected" => Visibility::Protected,
                _ => Visibility::Public,
            };
        }
    }
    Visibility::Public
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(|child| child.kind() == kind);
    result
}
