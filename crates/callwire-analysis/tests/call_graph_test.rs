//! Tests for call graph construction: callables, call resolution, aliasing.

use callwire_analysis::{analyze_call_graph, Analyzer, EdgeKind, Graph, GraphNode, NodeKind, Role};
use callwire_core::config::{AnalysisConfig, CallwireConfig};
use callwire_core::errors::{AnalysisError, CallwireErrorCode};

fn graph(files: &[(&str, &str)]) -> Graph {
    let scope: Vec<&str> = files.iter().map(|(path, _)| *path).collect();
    analyze_call_graph(files.iter().copied(), &scope)
}

fn node<'g>(graph: &'g Graph, label: &str) -> &'g GraphNode {
    graph
        .nodes
        .iter()
        .find(|n| n.label == label)
        .unwrap_or_else(|| panic!("no node labeled {label}: {:#?}", graph.nodes))
}

fn has_call(graph: &Graph, from: &str, to: &str) -> bool {
    let from = &node(graph, from).id;
    let to = &node(graph, to).id;
    graph
        .edges
        .iter()
        .any(|e| &e.from == from && &e.to == to && e.kind == EdgeKind::Call)
}

// ---- Basics ----

#[test]
fn same_file_call() {
    let g = graph(&[(
        "/p/a.ts",
        "function helper() {}\nfunction main() { helper(); }\n",
    )]);
    assert_eq!(g.nodes.len(), 2);
    assert_eq!(g.edges.len(), 1);
    assert!(has_call(&g, "main", "helper"));
    assert!(!g.edges[0].cross_file);

    let helper = node(&g, "helper");
    assert_eq!(helper.kind, NodeKind::FunctionDeclaration);
    assert_eq!(helper.role, Some(Role::Helper));
    assert_eq!(helper.is_async, Some(false));
    assert_eq!(helper.file_path, "/p/a.ts");
    assert!(helper.file_key.starts_with("a.ts#"));
}

#[test]
fn cross_file_call_through_named_import() {
    let g = graph(&[
        ("/p/a.ts", "export function util() {}\n"),
        (
            "/p/b.ts",
            "import { util } from './a';\nexport function run() { util(); }\n",
        ),
    ]);
    assert_eq!(g.edges.len(), 1);
    assert!(has_call(&g, "run", "util"));
    assert!(g.edges[0].cross_file);
}

#[test]
fn this_call_inside_suffix_classified_service() {
    let g = graph(&[(
        "/p/foo.ts",
        "export class FooService {\n  helper() { return 1; }\n  doWork() { return this.helper(); }\n}\n",
    )]);
    assert_eq!(g.nodes.len(), 2);
    assert_eq!(g.edges.len(), 1);
    assert!(has_call(&g, "FooService.doWork", "FooService.helper"));
    assert!(!g.edges[0].cross_file);
    for n in &g.nodes {
        assert_eq!(n.role, Some(Role::Service));
        assert_eq!(n.kind, NodeKind::Method);
        assert_eq!(n.class_name.as_deref(), Some("FooService"));
    }
}

#[test]
fn literal_element_access_resolves() {
    let g = graph(&[(
        "/p/run.ts",
        "class Runner { run() {} }\nfunction main() {\n  const obj = new Runner();\n  obj[\"run\"]();\n}\n",
    )]);
    assert!(has_call(&g, "main", "Runner.run"));
    assert_eq!(g.edges.len(), 1);
}

// ---- Element access ----

#[test]
fn const_identifier_key_resolves() {
    let g = graph(&[(
        "/p/run.ts",
        "const KEY = 'run';\nclass Runner { run() {} }\nfunction main(r: Runner) { r[KEY](); }\n",
    )]);
    assert!(has_call(&g, "main", "Runner.run"));
}

#[test]
fn template_key_without_substitution_resolves() {
    let g = graph(&[(
        "/p/run.ts",
        "class Runner { run() {} }\nfunction main(r: Runner) { r[`run`](); }\n",
    )]);
    assert!(has_call(&g, "main", "Runner.run"));
}

#[test]
fn dynamic_key_is_skipped() {
    let g = graph(&[(
        "/p/run.ts",
        "class Runner { run() {} }\nfunction main(r: Runner, name: string) { r[name](); r[`${name}`](); }\n",
    )]);
    assert!(g.edges.is_empty());
}

#[test]
fn element_access_falls_back_to_initializer_type() {
    // The annotated class lacks the member; the initializer's subclass has it.
    let g = graph(&[(
        "/p/run.ts",
        "class Base {}\n\
         class Job extends Base { run() {} }\n\
         function viaElement() { const t: Base = new Job(); t['run'](); }\n\
         function viaProperty() { const t: Base = new Job(); t.run(); }\n",
    )]);
    assert!(has_call(&g, "viaElement", "Job.run"));
    assert!(!has_call(&g, "viaProperty", "Job.run"));
}

// ---- Aliasing ----

#[test]
fn renamed_re_export_chain_unwraps() {
    let g = graph(&[
        ("/p/a.ts", "export function util() {}\n"),
        ("/p/index.ts", "export { util as helper } from './a';\n"),
        (
            "/p/b.ts",
            "import { helper as h } from './index';\nexport function run() { h(); }\n",
        ),
    ]);
    assert!(has_call(&g, "run", "util"));
}

#[test]
fn star_re_export_and_index_file() {
    let g = graph(&[
        ("/p/lib/math.ts", "export function add() {}\n"),
        ("/p/lib/index.ts", "export * from './math';\n"),
        (
            "/p/app.ts",
            "import { add } from './lib';\nfunction main() { add(); }\n",
        ),
    ]);
    assert!(has_call(&g, "main", "add"));
}

#[test]
fn namespace_import_member_call() {
    let g = graph(&[
        ("/p/a.ts", "export function util() {}\nexport const other = () => util();\n"),
        (
            "/p/b.ts",
            "import * as utils from './a';\nfunction main() { utils.util(); utils.other(); }\n",
        ),
    ]);
    assert!(has_call(&g, "main", "util"));
    assert!(has_call(&g, "main", "other"));
    assert!(has_call(&g, "other", "util"));
}

#[test]
fn default_export_anonymous_function() {
    let g = graph(&[
        ("/p/a.ts", "export default function () { return 1; }\n"),
        (
            "/p/b.ts",
            "import run from './a';\nexport function main() { run(); }\n",
        ),
    ]);
    let anon = node(&g, "<anon>");
    assert_eq!(anon.kind, NodeKind::FunctionExpression);
    assert!(has_call(&g, "main", "<anon>"));
}

#[test]
fn js_specifier_resolves_to_ts_file() {
    let g = graph(&[
        ("/p/a.ts", "export function util() {}\n"),
        (
            "/p/b.ts",
            "import { util } from './a.js';\nexport function run() { util(); }\n",
        ),
    ]);
    assert!(has_call(&g, "run", "util"));
}

#[test]
fn external_imports_are_dropped() {
    let g = graph(&[(
        "/p/a.ts",
        "import { readFile } from 'fs';\nexport function load() { readFile('x'); }\n",
    )]);
    assert_eq!(g.nodes.len(), 1);
    assert!(g.edges.is_empty());
}

// ---- Scopes ----

#[test]
fn local_binding_shadows_top_level_callable() {
    let g = graph(&[(
        "/p/a.ts",
        "function helper() {}\nfunction main() { const helper = () => 0; helper(); }\n",
    )]);
    assert!(g.edges.is_empty());
}

#[test]
fn parameter_shadows_top_level_callable() {
    let g = graph(&[(
        "/p/a.ts",
        "function helper() {}\nfunction main(helper: () => void) { helper(); }\n",
    )]);
    assert!(g.edges.is_empty());
}

#[test]
fn recursion_produces_no_self_edge() {
    let g = graph(&[(
        "/p/a.ts",
        "function fact(n: number): number { return n <= 1 ? 1 : n * fact(n - 1); }\n",
    )]);
    assert_eq!(g.nodes.len(), 1);
    assert!(g.edges.is_empty());
}

// ---- Receivers ----

#[test]
fn injected_property_call_resolves_through_annotation() {
    let g = graph(&[
        ("/p/repo.ts", "export class UserRepository { find() { return []; } }\n"),
        (
            "/p/service.ts",
            "import { UserRepository } from './repo';\n\
             export class UserService {\n\
               constructor(private readonly repo: UserRepository) {}\n\
               list() { return this.repo.find(); }\n\
             }\n",
        ),
    ]);
    assert!(has_call(&g, "UserService.list", "UserRepository.find"));
    assert!(g.edges[0].cross_file);
}

#[test]
fn awaited_promise_return_type_is_unwrapped() {
    let g = graph(&[(
        "/p/a.ts",
        "class Conn { query() {} }\n\
         async function connect(): Promise<Conn> { return new Conn(); }\n\
         async function main() { const c = await connect(); c.query(); }\n",
    )]);
    assert!(has_call(&g, "main", "connect"));
    assert!(has_call(&g, "main", "Conn.query"));
    assert_eq!(node(&g, "main").is_async, Some(true));
}

#[test]
fn inherited_method_resolves_through_extends() {
    let g = graph(&[(
        "/p/a.ts",
        "class Base { save() {} }\nclass Child extends Base { run() { this.save(); super.save(); } }\n",
    )]);
    assert!(has_call(&g, "Child.run", "Base.save"));
    assert_eq!(g.edges.len(), 1);
}

#[test]
fn static_method_through_class_name() {
    let g = graph(&[(
        "/p/a.ts",
        "class Ids { static next() { return 1; } }\nfunction main() { Ids.next(); }\n",
    )]);
    assert!(has_call(&g, "main", "Ids.next"));
}

#[test]
fn object_literal_member_resolves_to_function() {
    let g = graph(&[(
        "/p/a.ts",
        "function save() {}\nconst api = { save, other: save };\nfunction main() { api.save(); api['other'](); }\n",
    )]);
    assert!(has_call(&g, "main", "save"));
}

#[test]
fn nullable_annotation_is_narrowed() {
    let g = graph(&[(
        "/p/a.ts",
        "class Cache { get() {} }\nfunction main(c: Cache | null) { c!.get(); }\n",
    )]);
    assert!(has_call(&g, "main", "Cache.get"));
}

#[test]
fn untyped_receiver_is_dropped() {
    let g = graph(&[(
        "/p/a.ts",
        "class A { run() {} }\nclass B { run() {} }\nfunction main(x) { x.run(); }\n",
    )]);
    assert!(g.edges.is_empty());
}

#[test]
fn long_field_chains_resolve() {
    // Root.c: C1, C1.n: C2, ... C9.n: C10, and only C10 has go().
    let hops = 9;
    let mut source = String::from("class C10 { go() {} }\n");
    for i in (1..=hops).rev() {
        source.push_str(&format!("class C{i} {{ n: C{}; }}\n", i + 1));
    }
    source.push_str(&format!(
        "class Root {{ c: C1; run() {{ this.c{}.go(); }} }}\n",
        ".n".repeat(hops)
    ));
    let g = graph(&[("/p/chain.ts", source.as_str())]);
    assert!(has_call(&g, "Root.run", "C10.go"));
}

#[test]
fn cyclic_initializers_terminate() {
    let g = graph(&[(
        "/p/cycle.ts",
        "let a = b;\nlet b = a;\nfunction main() { a.run(); b['run'](); }\n",
    )]);
    assert!(g.edges.is_empty());
}

// ---- Callables ----

#[test]
fn arrow_and_function_valued_members_are_callables() {
    let g = graph(&[(
        "/p/a.ts",
        "export const start = async () => { boot(); };\n\
         const boot = function () {};\n\
         class Handler {\n\
           onEvent = () => this.process();\n\
           process() {}\n\
           get value() { return 1; }\n\
           constructor() {}\n\
         }\n",
    )]);
    let labels: Vec<&str> = g.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["start", "boot", "Handler.onEvent", "Handler.process"]);
    assert_eq!(node(&g, "start").kind, NodeKind::ArrowFunction);
    assert_eq!(node(&g, "start").is_async, Some(true));
    assert_eq!(node(&g, "boot").kind, NodeKind::FunctionExpression);
    assert_eq!(node(&g, "Handler.onEvent").kind, NodeKind::ArrowFunction);
    assert_eq!(node(&g, "Handler.onEvent").role, None);
    assert!(has_call(&g, "start", "boot"));
    assert!(has_call(&g, "Handler.onEvent", "Handler.process"));
}

#[test]
fn overload_like_duplicates_get_distinct_ids() {
    let g = graph(&[(
        "/p/a.ts",
        "function dup() {}\nfunction dup() {}\n",
    )]);
    assert_eq!(g.nodes.len(), 2);
    assert_ne!(g.nodes[0].id, g.nodes[1].id);
}

#[test]
fn scope_limits_nodes_but_not_resolution() {
    let files = [
        ("/p/a.ts", "export function util() {}\n"),
        ("/p/b.ts", "import { util } from './a';\nexport function run() { util(); }\n"),
    ];
    let g = analyze_call_graph(files, &["/p/b.ts"]);
    assert_eq!(g.nodes.len(), 1);
    assert_eq!(g.nodes[0].label, "run");
    // The callee is not a collected callable, so the call is dropped.
    assert!(g.edges.is_empty());
}

// ---- Errors ----

#[test]
fn broken_file_contributes_nothing() {
    let files = [
        ("/p/ok.ts", "import { f } from './bad';\nexport function ok() { f(); }\n"),
        ("/p/bad.ts", "export function f( {\n"),
    ];
    let result = Analyzer::default().call_graph(files, &["/p/ok.ts", "/p/bad.ts"]);
    assert_eq!(result.data.nodes.len(), 1);
    assert!(result.data.edges.is_empty());
    assert_eq!(result.error_count(), 1);
    assert_eq!(result.errors[0].error_code(), "PARSE_ERROR");
}

#[test]
fn unknown_scope_path_is_recorded() {
    let files = [("/p/a.ts", "function a() {}\n")];
    let result = Analyzer::default().call_graph(files, &["/p/a.ts", "/p/missing.ts"]);
    assert_eq!(result.data.nodes.len(), 1);
    assert!(matches!(
        &result.errors[..],
        [AnalysisError::UnknownScopePath { path }] if path == "/p/missing.ts"
    ));
}

#[test]
fn tolerant_mode_keeps_partial_files() {
    let config = CallwireConfig {
        analysis: AnalysisConfig {
            tolerate_syntax_errors: Some(true),
            ..Default::default()
        },
        ..Default::default()
    };
    let files = [("/p/a.ts", "function helper() {}\nfunction main() { helper(); }\nlet = ;\n")];
    let result = Analyzer::new(config).call_graph(files, &["/p/a.ts"]);
    assert!(result.is_clean());
    assert!(has_call(&result.data, "main", "helper"));
}

#[test]
fn empty_input_yields_empty_graph() {
    let files: [(&str, &str); 0] = [];
    let scope: [&str; 0] = [];
    let g = analyze_call_graph(files, &scope);
    assert!(g.is_empty());
}

#[test]
fn javascript_files_are_analyzed() {
    let g = graph(&[
        ("/p/util.js", "export function util() {}\n"),
        (
            "/p/main.mjs",
            "import { util } from './util.js';\nexport function main() { util(); }\n",
        ),
    ]);
    assert!(has_call(&g, "main", "util"));
}
