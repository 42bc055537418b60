use super::{check_tree, init_parser, line_of, node_text};
use crate::error::{ParserError, Result};
use crate::language::Language;
use crate::parser::LanguageParser;
use crate::type_name;
use crate::types::{
    ClassInfo, ClassKind, FunctionInfo, ImportInfo, MethodInfo, ParameterInfo, PropertyInfo,
    UnifiedAst, Visibility,
};
use tree_sitter::{Node, Parser};

/// Python grammar adapter.
///
/// Visibility follows the underscore convention: `__name` is private,
/// `_name` protected, dunders and everything else public. Module exports
/// are the public top-level class and function names.
pub struct PythonParser {
    parser: Option<Parser>,
}

impl PythonParser {
    /// Create the adapter; the grammar is loaded on first parse
    pub fn new() -> Self {
        Self { parser: None }
    }

    fn parser(&mut self) -> Result<&mut Parser> {
        if self.parser.is_none() {
            let grammar = tree_sitter_python::LANGUAGE.into();
            self.parser = Some(init_parser(&grammar)?);
        }
        self.parser
            .as_mut()
            .ok_or_else(|| ParserError::grammar("python parser unavailable"))
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageParser for PythonParser {
    fn parse(&mut self, source: &str, file_path: &str) -> Result<UnifiedAst> {
        let tree = self
            .parser()?
            .parse(source, None)
            .ok_or_else(|| ParserError::parse(file_path, "tree-sitter returned no tree"))?;
        check_tree(&tree, file_path)?;

        let mut ast = UnifiedAst::new(Language::Python, file_path);
        let root = tree.root_node();
        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            walk_top_level(&mut ast, child, source);
        }
        Ok(ast)
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

fn walk_top_level(ast: &mut UnifiedAst, node: Node, source: &str) {
    match node.kind() {
        "import_statement" => extract_plain_imports(ast, node, source),
        "import_from_statement" => {
            if let Some(import) = extract_from_import(node, source) {
                ast.imports.push(import);
            }
        }
        "class_definition" => {
            if let Some(class) = extract_class(node, source) {
                if !class.name.starts_with('_') {
                    ast.exports.push(class.name.clone());
                }
                ast.classes.push(class);
            }
        }
        "function_definition" => {
            if let Some(function) = extract_function(node, source) {
                if !function.name.starts_with('_') {
                    ast.exports.push(function.name.clone());
                }
                ast.functions.push(function);
            }
        }
        "decorated_definition" => {
            if let Some(definition) = node.child_by_field_name("definition") {
                walk_top_level(ast, definition, source);
            }
        }
        _ => {}
    }
}

/// `import a.b, c as d` — one namespace-style import per module
fn extract_plain_imports(ast: &mut UnifiedAst, node: Node, source: &str) {
    let line = line_of(node);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "dotted_name" => {
                let module = node_text(child, source);
                let mut import = ImportInfo::new(module, line);
                import.is_namespace = true;
                import.namespace_alias =
                    module.rsplit('.').next().map(|segment| segment.to_string());
                ast.imports.push(import);
            }
            "aliased_import" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                let mut import = ImportInfo::new(node_text(name, source), line);
                import.is_namespace = true;
                import.namespace_alias = child
                    .child_by_field_name("alias")
                    .map(|alias| node_text(alias, source).to_string());
                ast.imports.push(import);
            }
            _ => {}
        }
    }
}

/// `from .models import User, Role as R`
fn extract_from_import(node: Node, source: &str) -> Option<ImportInfo> {
    let module = node.child_by_field_name("module_name")?;
    let mut import = ImportInfo::new(node_text(module, source), line_of(node));

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        // Skip the module path itself
        if child.id() == module.id() {
            continue;
        }
        match child.kind() {
            "dotted_name" | "identifier" => {
                import.push_specifier(node_text(child, source));
            }
            "aliased_import" => {
                // The local binding is the alias
                let name = child
                    .child_by_field_name("alias")
                    .or_else(|| child.child_by_field_name("name"));
                if let Some(name) = name {
                    import.push_specifier(node_text(name, source));
                }
            }
            "wildcard_import" => import.is_namespace = true,
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

    // Multiple inheritance: the first base is `extends`, the rest land in
    // `implements` so they are not lost.
    if let Some(superclasses) = node.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        let mut bases = superclasses
            .named_children(&mut cursor)
            .filter(|base| matches!(base.kind(), "identifier" | "attribute"))
            .map(|base| base_name(base, source));
        class.extends = bases.next();
        class.implements.extend(bases);
    }

    if let Some(body) = node.child_by_field_name("body") {
        let mut cursor = body.walk();
        for member in body.children(&mut cursor) {
            extract_class_member(&mut class, member, source);
        }
    }

    Some(class)
}

fn extract_class_member(class: &mut ClassInfo, member: Node, source: &str) {
    match member.kind() {
        "function_definition" => {
            let Some(name_node) = member.child_by_field_name("name") else {
                return;
            };
            let name = node_text(name_node, source).to_string();
            let parameters = extract_parameters(member, source);

            if name == "__init__" {
                class.constructor_params = parameters;
                return;
            }

            class.methods.push(MethodInfo {
                visibility: underscore_visibility(&name),
                name,
                parameters,
                return_type: member
                    .child_by_field_name("return_type")
                    .map(|ret| node_text(ret, source).to_string()),
                line_number: line_of(member),
            });
        }
        "decorated_definition" => {
            if let Some(definition) = member.child_by_field_name("definition") {
                extract_class_member(class, definition, source);
            }
        }
        // Annotated class attribute: `repo: UserRepo` or `repo: UserRepo = ...`
        "expression_statement" => {
            let Some(assignment) = member.named_child(0).filter(|n| n.kind() == "assignment")
            else {
                return;
            };
            let Some(ty) = assignment.child_by_field_name("type") else {
                return;
            };
            let Some(left) = assignment
                .child_by_field_name("left")
                .filter(|n| n.kind() == "identifier")
            else {
                return;
            };

            let name = node_text(left, source).to_string();
            let annotation = node_text(ty, source).to_string();
            let (base, is_array) = type_name::strip_array(&annotation);
            let is_class_type = type_name::annotation_is_class_type(&base);

            class.properties.push(PropertyInfo {
                visibility: underscore_visibility(&name),
                name,
                type_annotation: Some(annotation),
                is_array,
                is_class_type,
                is_static: false,
                line_number: line_of(member),
            });
        }
        _ => {}
    }
}

fn extract_function(node: Node, source: &str) -> Option<FunctionInfo> {
    let name_node = node.child_by_field_name("name")?;
    Some(FunctionInfo {
        name: node_text(name_node, source).to_string(),
        parameters: extract_parameters(node, source),
        return_type: node
            .child_by_field_name("return_type")
            .map(|ret| node_text(ret, source).to_string()),
        is_async: {
            let mut cursor = node.walk();
            let result = node.children(&mut cursor).any(|c| c.kind() == "async");
            result
        },
        line_number: line_of(node),
    })
}

fn extract_parameters(definition: Node, source: &str) -> Vec<ParameterInfo> {
    let Some(params) = definition.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        let info = match param.kind() {
            "identifier" => ParameterInfo {
                name: node_text(param, source).to_string(),
                type_annotation: None,
                visibility: None,
            },
            "typed_parameter" => {
                let Some(name) = param.named_child(0).filter(|n| n.kind() == "identifier")
                else {
                    continue;
                };
                ParameterInfo {
                    name: node_text(name, source).to_string(),
                    type_annotation: param
                        .child_by_field_name("type")
                        .map(|ty| node_text(ty, source).to_string()),
                    visibility: None,
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                let Some(name) = param.child_by_field_name("name") else {
                    continue;
                };
                ParameterInfo {
                    name: node_text(name, source).to_string(),
                    type_annotation: param
                        .child_by_field_name("type")
                        .map(|ty| node_text(ty, source).to_string()),
                    visibility: None,
                }
            }
            _ => continue,
        };
        if info.name == "self" || info.name == "cls" {
            continue;
        }
        out.push(info);
    }
    out
}

/// `python.attribute` base: last dotted segment
fn base_name(node: Node, source: &str) -> String {
    let text = node_text(node, source);
    text.rsplit('.').next().unwrap_or(text).to_string()
}

fn underscore_visibility(name: &str) -> Visibility {
    let is_dunder = name.starts_with("__") && name.ends_with("__");
    if name.starts_with("__") && !is_dunder {
        Visibility::Private
    } else if name.starts_with('_') && !is_dunder {
        Visibility::Protected
    } else {
        Visibility::Public
    }
}
