//! Per-file participant/interaction extraction for sequence diagrams.
//!
//! Three structural passes over a tree-sitter parse, no cross-file
//! resolution: declarations become participants, a variable/field type
//! map is inferred from annotations and `new` assignments, then call
//! expressions are resolved to target participants. Control-flow
//! insensitive; calls are recorded in source order of appearance.

use crate::error::{AnalyzerError, Result};
use crate::types::{
    EntryPoint, InteractionKind, ParticipantKind, SequenceInteraction, SequenceModel,
    SequenceParticipant,
};
use relmap_ast::{type_name, Language, ParserError};
use std::collections::{HashMap, HashSet};
use tree_sitter::{Node, Parser};

/// Participant name used when a file declares no class or function
const MODULE_PARTICIPANT: &str = "Module";

/// Global objects whose calls are incidental standard-library use
const BUILTIN_TARGETS: &[&str] = &[
    "console", "Math", "JSON", "Date", "Object", "Array", "String", "Number", "Boolean",
    "Promise", "Map", "Set", "WeakMap", "WeakSet", "Symbol", "RegExp", "Error", "Reflect",
    "Proxy", "Intl", "Atomics", "process", "window", "document", "globalThis",
];

/// Method names suppressed as diagram noise
const DENY_METHODS: &[&str] = &[
    "constructor",
    "toString",
    "valueOf",
    "hasOwnProperty",
    "bind",
    "call",
    "apply",
];

/// Builds a [`SequenceModel`] from one TypeScript or JavaScript file.
///
/// Other languages fail construction with
/// [`AnalyzerError::UnsupportedLanguage`]; diagram extraction leans on
/// ECMAScript call syntax and has no grammar-neutral fallback.
pub struct SequenceAnalyzer {
    language: Language,
    parser: Option<Parser>,
}

impl std::fmt::Debug for SequenceAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceAnalyzer")
            .field("language", &self.language)
            .field("parser", &self.parser.as_ref().map(|_| "Parser"))
            .finish()
    }
}

impl SequenceAnalyzer {
    pub fn new(language: Language) -> Result<Self> {
        if !Self::supports(language) {
            return Err(AnalyzerError::UnsupportedLanguage { language });
        }
        Ok(Self {
            language,
            parser: None,
        })
    }

    /// Whether `language` has sequence extraction support
    pub fn supports(language: Language) -> bool {
        matches!(language, Language::TypeScript | Language::JavaScript)
    }

    fn parser(&mut self) -> Result<&mut Parser> {
        if self.parser.is_none() {
            let grammar: tree_sitter::Language = match self.language {
                Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
                _ => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            };
            let mut parser = Parser::new();
            parser
                .set_language(&grammar)
                .map_err(|e| ParserError::grammar(format!("Failed to set language: {e}")))?;
            self.parser = Some(parser);
        }
        self.parser
            .as_mut()
            .ok_or_else(|| ParserError::grammar("sequence parser unavailable").into())
    }

    /// Run the three passes over `source`
    pub fn analyze(&mut self, source: &str, file_path: &str) -> Result<SequenceModel> {
        let tree = self
            .parser()?
            .parse(source, None)
            .ok_or_else(|| ParserError::parse(file_path, "tree-sitter returned no tree"))?;
        if tree.root_node().has_error() {
            return Err(ParserError::parse(file_path, "syntax error").into());
        }

        let mut builder = ModelBuilder::new(source);
        builder.collect_declarations(tree.root_node());
        builder.collect_types(tree.root_node());
        builder.collect_interactions(tree.root_node());
        let model = builder.finish();
        log::debug!(
            "Sequence model for {file_path}: {} participants, {} interactions",
            model.participants.len(),
            model.interactions.len()
        );
        Ok(model)
    }
}

struct MethodEntry {
    name: String,
    is_public: bool,
    line: usize,
}

/// Per-analysis state shared by the three passes
struct ModelBuilder<'s> {
    source: &'s str,
    participants: Vec<SequenceParticipant>,
    interactions: Vec<SequenceInteraction>,
    /// Class name → declared methods, for entry points
    classes: Vec<(String, Vec<MethodEntry>)>,
    functions: Vec<(String, usize)>,
    /// Locally declared plus imported uppercase names
    known_classes: HashSet<String>,
    /// `this.prop` or variable name → inferred class
    type_map: HashMap<String, String>,
}

impl<'s> ModelBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            participants: Vec::new(),
            interactions: Vec::new(),
            classes: Vec::new(),
            functions: Vec::new(),
            known_classes: HashSet::new(),
            type_map: HashMap::new(),
        }
    }

    fn text(&self, node: Node) -> &'s str {
        &self.source[node.start_byte()..node.end_byte()]
    }

    // Pass 1: declarations → participants and known classes

    fn collect_declarations(&mut self, root: Node) {
        let mut cursor = root.walk();
        for top in root.named_children(&mut cursor) {
            let node = declaration_of(top);
            match node.kind() {
                "class_declaration" | "abstract_class_declaration" => self.declare_class(node),
                "function_declaration" | "generator_function_declaration" => {
                    if let Some(name) = node.child_by_field_name("name") {
                        self.declare_function(self.text(name).to_string(), line_of(name));
                    }
                }
                "lexical_declaration" | "variable_declaration" => {
                    self.declare_bound_functions(node)
                }
                "import_statement" => self.declare_imported_classes(node),
                _ => {}
            }
        }

        if self.classes.is_empty() && self.functions.is_empty() {
            self.ensure_participant(MODULE_PARTICIPANT, ParticipantKind::Module, None);
        }
    }

    fn declare_class(&mut self, node: Node) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let class_name = self.text(name).to_string();

        let mut methods = Vec::new();
        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for member in body.named_children(&mut cursor) {
                if member.kind() != "method_definition" {
                    continue;
                }
                let Some(method_name) = member.child_by_field_name("name") else {
                    continue;
                };
                methods.push(MethodEntry {
                    name: self.text(method_name).to_string(),
                    is_public: is_public(member, self.source),
                    line: line_of(member),
                });
            }
        }

        self.ensure_participant(&class_name, ParticipantKind::Class, Some(line_of(node)));
        self.known_classes.insert(class_name.clone());
        self.classes.push((class_name, methods));
    }

    fn declare_function(&mut self, name: String, line: usize) {
        self.ensure_participant(&name, ParticipantKind::Function, Some(line));
        self.functions.push((name, line));
    }

    /// `const f = () => ...` and `const f = function () ...` bindings
    fn declare_bound_functions(&mut self, node: Node) {
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let (Some(name), Some(value)) = (
                declarator.child_by_field_name("name"),
                declarator.child_by_field_name("value"),
            ) else {
                continue;
            };
            if matches!(value.kind(), "arrow_function" | "function_expression" | "function") {
                self.declare_function(self.text(name).to_string(), line_of(name));
            }
        }
    }

    /// Imported uppercase names are class candidates for call validation
    fn declare_imported_classes(&mut self, node: Node) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let mut cursor = current.walk();
            for child in current.named_children(&mut cursor) {
                if child.kind() == "identifier" {
                    let name = self.text(child);
                    if type_name::is_class_like(name) {
                        self.known_classes.insert(name.to_string());
                    }
                } else {
                    stack.push(child);
                }
            }
        }
    }

    // Pass 2: variable/field class inference

    fn collect_types(&mut self, node: Node) {
        match node.kind() {
            "public_field_definition" | "field_definition" | "property_signature" => {
                self.record_annotated_field(node)
            }
            "required_parameter" | "optional_parameter" => self.record_parameter_property(node),
            "variable_declarator" => self.record_constructed_variable(node),
            "assignment_expression" => self.record_assignment(node),
            _ => {}
        }

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect_types(child);
        }
    }

    /// `private repo: UserRepo;` → this.repo : UserRepo
    fn record_annotated_field(&mut self, node: Node) {
        let (Some(name), Some(class)) = (
            node.child_by_field_name("name"),
            self.annotated_class(node),
        ) else {
            return;
        };
        let key = format!("this.{}", self.text(name));
        self.type_map.insert(key, class);
    }

    /// `constructor(private repo: UserRepo)` → this.repo : UserRepo
    fn record_parameter_property(&mut self, node: Node) {
        if !has_child_kind(node, "accessibility_modifier") {
            return;
        }
        let (Some(pattern), Some(class)) = (
            node.child_by_field_name("pattern"),
            self.annotated_class(node),
        ) else {
            return;
        };
        if pattern.kind() == "identifier" {
            let key = format!("this.{}", self.text(pattern));
            self.type_map.insert(key, class);
        }
    }

    /// `const repo = new UserRepo()` → repo : UserRepo
    fn record_constructed_variable(&mut self, node: Node) {
        let (Some(name), Some(value)) = (
            node.child_by_field_name("name"),
            node.child_by_field_name("value"),
        ) else {
            return;
        };
        if name.kind() != "identifier" {
            return;
        }
        if let Some(class) = self.constructed_class(value) {
            self.type_map.insert(self.text(name).to_string(), class);
        }
    }

    /// `this.x = new C()` and `x = new C()`
    fn record_assignment(&mut self, node: Node) {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        let Some(class) = self.constructed_class(right) else {
            return;
        };
        if let Some(path) = member_path(left, self.source) {
            self.type_map.insert(path.join("."), class);
        }
    }

    fn annotated_class(&self, node: Node) -> Option<String> {
        let annotation = node.child_by_field_name("type")?.named_child(0)?;
        let (base, is_array) = type_name::strip_array(self.text(annotation));
        let (name, _) = type_name::split_generic(&base);
        (!is_array && type_name::is_class_like(&name)).then_some(name)
    }

    fn constructed_class(&self, node: Node) -> Option<String> {
        if node.kind() != "new_expression" {
            return None;
        }
        let constructor = node.child_by_field_name("constructor")?;
        if constructor.kind() != "identifier" {
            return None;
        }
        let name = self.text(constructor);
        type_name::is_class_like(name).then(|| name.to_string())
    }

    // Pass 3: call extraction

    fn collect_interactions(&mut self, root: Node) {
        let mut cursor = root.walk();
        let mut in_scope = false;
        for top in root.named_children(&mut cursor) {
            let node = declaration_of(top);
            match node.kind() {
                "class_declaration" | "abstract_class_declaration" => {
                    in_scope = true;
                    self.walk_class_bodies(node);
                }
                "function_declaration" | "generator_function_declaration" => {
                    in_scope = true;
                    if let (Some(name), Some(body)) = (
                        node.child_by_field_name("name"),
                        node.child_by_field_name("body"),
                    ) {
                        let from = self.text(name).to_string();
                        self.walk_calls(&from, body);
                    }
                }
                "lexical_declaration" | "variable_declaration" => {
                    if self.walk_bound_function_bodies(node) {
                        in_scope = true;
                    }
                }
                _ => {}
            }
        }

        // Fallback participant: extract the file's top-level calls
        if !in_scope && !self.participants.is_empty() {
            let from = MODULE_PARTICIPANT.to_string();
            self.walk_calls(&from, root);
        }
    }

    fn walk_class_bodies(&mut self, class_node: Node) {
        let Some(name) = class_node.child_by_field_name("name") else {
            return;
        };
        let from = self.text(name).to_string();
        let Some(body) = class_node.child_by_field_name("body") else {
            return;
        };
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() != "method_definition" {
                continue;
            }
            if let Some(method_body) = member.child_by_field_name("body") {
                self.walk_calls(&from, method_body);
            }
        }
    }

    /// Returns whether any function-valued binding was walked
    fn walk_bound_function_bodies(&mut self, node: Node) -> bool {
        let mut walked = false;
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let (Some(name), Some(value)) = (
                declarator.child_by_field_name("name"),
                declarator.child_by_field_name("value"),
            ) else {
                continue;
            };
            if matches!(value.kind(), "arrow_function" | "function_expression" | "function") {
                let from = self.text(name).to_string();
                if let Some(body) = value.child_by_field_name("body") {
                    self.walk_calls(&from, body);
                    walked = true;
                }
            }
        }
        walked
    }

    /// Pre-order walk recording every call and `new` expression in
    /// source order
    fn walk_calls(&mut self, from: &str, node: Node) {
        match node.kind() {
            "call_expression" => self.handle_call(from, node),
            "new_expression" => self.handle_new(from, node),
            _ => {}
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.walk_calls(from, child);
        }
    }

    fn handle_call(&mut self, from: &str, node: Node) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        let kind = if is_awaited(node) {
            InteractionKind::Async
        } else {
            InteractionKind::Sync
        };

        match function.kind() {
            "member_expression" => {
                let Some(path) = member_path(function, self.source) else {
                    return;
                };
                let (method, receiver) = match path.split_last() {
                    Some(split) => split,
                    None => return,
                };
                if receiver.is_empty() || DENY_METHODS.contains(&method.as_str()) {
                    return;
                }
                let Some(target) = self.resolve_receiver(from, receiver) else {
                    return;
                };
                let message = format!("{method}({})", self.arguments_text(node));
                self.emit(from, &target, message, kind, line_of(node));
            }
            "identifier" => {
                let callee = self.text(function).to_string();
                // Bare calls only map to locally declared functions
                if self.functions.iter().any(|(name, _)| *name == callee) {
                    let message = format!("{callee}({})", self.arguments_text(node));
                    self.emit(from, &callee, message, kind, line_of(node));
                }
            }
            _ => {}
        }
    }

    fn handle_new(&mut self, from: &str, node: Node) {
        let Some(class) = self.constructed_class(node) else {
            return;
        };
        if is_suppressed(&class) {
            return;
        }
        let message = format!("new {class}({})", self.arguments_text(node));
        self.emit(from, &class, message, InteractionKind::Sync, line_of(node));
    }

    /// Resolve a receiver path to a participant, in priority order:
    /// same-object, type map (longest known prefix wins), capitalization
    /// heuristic, then known-class validation.
    fn resolve_receiver(&self, from: &str, receiver: &[String]) -> Option<String> {
        if receiver == ["this"] {
            return self
                .classes
                .iter()
                .any(|(name, _)| name == from)
                .then(|| from.to_string());
        }

        for end in (1..=receiver.len()).rev() {
            let key = receiver[..end].join(".");
            if let Some(class) = self.type_map.get(&key) {
                return Some(class.clone());
            }
        }

        let head = receiver.first()?;
        if is_suppressed(head) {
            return None;
        }
        if type_name::is_class_like(head) {
            return Some(head.clone());
        }
        if self.known_classes.contains(head.as_str()) {
            return Some(head.clone());
        }
        None
    }

    /// Record a forward edge and its implicit return edge
    fn emit(
        &mut self,
        from: &str,
        target: &str,
        message: String,
        kind: InteractionKind,
        line: usize,
    ) {
        if is_suppressed(target) {
            return;
        }
        self.ensure_participant(target, ParticipantKind::Class, None);
        self.interactions.push(SequenceInteraction {
            from: from.to_string(),
            to: target.to_string(),
            message,
            kind,
            line_number: Some(line),
        });
        self.interactions.push(SequenceInteraction {
            from: target.to_string(),
            to: from.to_string(),
            message: "return".to_string(),
            kind: InteractionKind::Return,
            line_number: Some(line),
        });
    }

    fn arguments_text(&self, node: Node) -> String {
        let Some(arguments) = node.child_by_field_name("arguments") else {
            return String::new();
        };
        let mut cursor = arguments.walk();
        let rendered: Vec<&str> = arguments
            .named_children(&mut cursor)
            .map(|argument| self.text(argument))
            .collect();
        rendered.join(", ")
    }

    fn ensure_participant(&mut self, name: &str, kind: ParticipantKind, line: Option<usize>) {
        if self.participants.iter().any(|p| p.name == name) {
            return;
        }
        self.participants.push(SequenceParticipant {
            name: name.to_string(),
            kind,
            line_number: line,
        });
    }

    fn finish(self) -> SequenceModel {
        let mut entry_points = Vec::new();
        for (class, methods) in &self.classes {
            for method in methods {
                if method.is_public && method.name != "constructor" {
                    entry_points.push(EntryPoint {
                        participant: class.clone(),
                        name: method.name.clone(),
                        line_number: method.line,
                    });
                }
            }
        }
        if self.classes.is_empty() {
            for (function, line) in &self.functions {
                entry_points.push(EntryPoint {
                    participant: function.clone(),
                    name: function.clone(),
                    line_number: *line,
                });
            }
        }

        SequenceModel {
            participants: self.participants,
            interactions: self.interactions,
            entry_points,
        }
    }
}

/// Unwrap `export ...` down to the declared node
fn declaration_of(node: Node) -> Node {
    if node.kind() != "export_statement" {
        return node;
    }
    if let Some(declaration) = node.child_by_field_name("declaration") {
        return declaration;
    }
    node
}

/// Flatten a member-expression chain into a property path, e.g.
/// `this.a.b.method` → `["this", "a", "b", "method"]`. `None` when the
/// chain roots in something other than a plain identifier.
fn member_path(node: Node, source: &str) -> Option<Vec<String>> {
    let mut reversed = Vec::new();
    let mut current = node;
    loop {
        match current.kind() {
            "member_expression" => {
                let property = current.child_by_field_name("property")?;
                reversed.push(source[property.start_byte()..property.end_byte()].to_string());
                current = current.child_by_field_name("object")?;
            }
            "identifier" | "this" | "super" => {
                reversed.push(source[current.start_byte()..current.end_byte()].to_string());
                reversed.reverse();
                return Some(reversed);
            }
            _ => return None,
        }
    }
}

fn is_awaited(node: Node) -> bool {
    node.parent()
        .map(|parent| parent.kind() == "await_expression")
        .unwrap_or(false)
}

fn is_public(method: Node, source: &str) -> bool {
    let mut cursor = method.walk();
    for child in method.children(&mut cursor) {
        if child.kind() == "accessibility_modifier" {
            let text = &source[child.start_byte()..child.end_byte()];
            return text != "private" && text != "protected";
        }
    }
    true
}

fn is_suppressed(target: &str) -> bool {
    target.len() <= 1 || BUILTIN_TARGETS.contains(&target) || DENY_METHODS.contains(&target)
}

fn has_child_kind(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let result = node.children(&mut cursor).any(|child| child.kind() == kind);
    result
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn analyze(source: &str) -> SequenceModel {
        SequenceAnalyzer::new(Language::TypeScript)
            .unwrap()
            .analyze(source, "/src/test.ts")
            .unwrap()
    }

    #[test]
    fn test_unsupported_language() {
        let err = SequenceAnalyzer::new(Language::Python).unwrap_err();
        assert!(matches!(err, AnalyzerError::UnsupportedLanguage { .. }));
    }

    #[test]
    fn test_participants_and_entry_points() {
        let model = analyze(
            r#"
export class OrderService {
    constructor(private repo: OrderRepo) {}
    place(order: Order): void {}
    private audit(): void {}
}
function main(): void {}
"#,
        );

        let names: Vec<&str> = model.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["OrderService", "main"]);

        assert_eq!(model.entry_points.len(), 1);
        assert_eq!(model.entry_points[0].participant, "OrderService");
        assert_eq!(model.entry_points[0].name, "place");
    }

    #[test]
    fn test_module_fallback() {
        let model = analyze("console.log('hi');\nconst answer = 42;\n");
        assert_eq!(model.participants.len(), 1);
        assert_eq!(model.participants[0].name, "Module");
        assert_eq!(model.participants[0].kind, ParticipantKind::Module);
        // console is a suppressed builtin
        assert!(model.interactions.is_empty());
    }

    #[test]
    fn test_member_call_through_parameter_property() {
        let model = analyze(
            r#"
class UserController {
    constructor(private service: UserService) {}
    handle(): void {
        this.service.listUsers();
    }
}
"#,
        );

        assert_eq!(model.interactions.len(), 2);
        let call = &model.interactions[0];
        assert_eq!(call.from, "UserController");
        assert_eq!(call.to, "UserService");
        assert_eq!(call.message, "listUsers()");
        assert_eq!(call.kind, InteractionKind::Sync);

        let ret = &model.interactions[1];
        assert_eq!(ret.from, "UserService");
        assert_eq!(ret.to, "UserController");
        assert_eq!(ret.message, "return");
        assert_eq!(ret.kind, InteractionKind::Return);
    }

    #[test]
    fn test_awaited_call_is_async() {
        let model = analyze(
            r#"
class Worker {
    private queue: JobQueue;
    async run(): Promise<void> {
        await this.queue.next();
    }
}
"#,
        );

        assert_eq!(model.interactions[0].kind, InteractionKind::Async);
        assert_eq!(model.interactions[0].message, "next()");
        assert_eq!(model.interactions[1].kind, InteractionKind::Return);
    }

    #[test]
    fn test_deep_member_chain_resolves_through_type_map() {
        let model = analyze(
            r#"
class App {
    private core: Engine;
    boot(): void {
        this.core.registry.plugins.load("auth");
    }
}
"#,
        );

        // Deepest known prefix is this.core; the call attributes there
        assert_eq!(model.interactions[0].to, "Engine");
        assert_eq!(model.interactions[0].message, "load(\"auth\")");
    }

    #[test]
    fn test_constructed_variable_and_new_edge() {
        let model = analyze(
            r#"
function main(): void {
    const cache = new Cache();
    cache.get("key");
}
"#,
        );

        assert_eq!(model.interactions.len(), 4);
        assert_eq!(model.interactions[0].message, "new Cache()");
        assert_eq!(model.interactions[0].to, "Cache");
        assert_eq!(model.interactions[2].message, "get(\"key\")");
        assert_eq!(model.interactions[2].from, "main");
        assert_eq!(model.interactions[2].to, "Cache");
    }

    #[test]
    fn test_self_call_stays_in_class() {
        let model = analyze(
            r#"
class Batch {
    run(): void {
        this.flush();
    }
    flush(): void {}
}
"#,
        );

        assert_eq!(model.interactions[0].from, "Batch");
        assert_eq!(model.interactions[0].to, "Batch");
        assert_eq!(model.interactions[0].message, "flush()");
    }

    #[test]
    fn test_static_call_by_capitalization() {
        let model = analyze(
            r#"
import { Logger } from './Logger';
class Service {
    work(): void {
        Logger.info("working");
        Math.max(1, 2);
    }
}
"#,
        );

        // Math is builtin-suppressed; Logger survives
        assert_eq!(model.interactions.len(), 2);
        assert_eq!(model.interactions[0].to, "Logger");
        assert_eq!(model.interactions[0].message, "info(\"working\")");
    }

    #[test]
    fn test_bare_call_to_declared_function() {
        let model = analyze(
            r#"
function helper(): void {}
function main(): void {
    helper();
    unknownGlobal();
}
"#,
        );

        assert_eq!(model.interactions.len(), 2);
        assert_eq!(model.interactions[0].from, "main");
        assert_eq!(model.interactions[0].to, "helper");
    }

    #[test]
    fn test_syntax_error_fails() {
        let err = SequenceAnalyzer::new(Language::TypeScript)
            .unwrap()
            .analyze("class {", "/src/bad.ts")
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Parser(_)));
    }
}
