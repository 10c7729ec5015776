use crate::domain::model::ModuleSet;
use crate::utils::error::Result;
use rustpython_parser::ast;

/// Collects the top-level module names imported anywhere in `source`.
///
/// `import a.b as c` yields `a`; `from a.b import c` yields `a`; relative
/// imports (`from . import x`, `from ..pkg import y`) are ignored. Invalid
/// Python is an error, there is no partial scan.
pub fn scan_imports(source: &str) -> Result<ModuleSet> {
    let parsed = rustpython_parser::parse(source, rustpython_parser::Mode::Module, "<script>")?;

    let mut modules = ModuleSet::new();
    if let ast::Mod::Module(module) = &parsed {
        collect_body(&module.body, &mut modules);
    }

    tracing::debug!("Scanner found {} imported modules: {:?}", modules.len(), modules);
    Ok(modules)
}

fn first_segment(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

fn collect_body(body: &[ast::Stmt], modules: &mut ModuleSet) {
    for stmt in body {
        collect_stmt(stmt, modules);
    }
}

fn collect_stmt(stmt: &ast::Stmt, modules: &mut ModuleSet) {
    match stmt {
        ast::Stmt::Import(import) => {
            for alias in &import.names {
                modules.insert(first_segment(alias.name.as_str()).to_string());
            }
        }
        ast::Stmt::ImportFrom(import_from) => {
            let level = import_from.level.as_ref().map_or(0, |level| level.to_u32());
            if level > 0 {
                return;
            }
            if let Some(module) = &import_from.module {
                modules.insert(first_segment(module.as_str()).to_string());
            }
        }
        ast::Stmt::FunctionDef(def) => collect_body(&def.body, modules),
        ast::Stmt::AsyncFunctionDef(def) => collect_body(&def.body, modules),
        ast::Stmt::ClassDef(def) => collect_body(&def.body, modules),
        ast::Stmt::If(node) => {
            collect_body(&node.body, modules);
            collect_body(&node.orelse, modules);
        }
        ast::Stmt::For(node) => {
            collect_body(&node.body, modules);
            collect_body(&node.orelse, modules);
        }
        ast::Stmt::AsyncFor(node) => {
            collect_body(&node.body, modules);
            collect_body(&node.orelse, modules);
        }
        ast::Stmt::While(node) => {
            collect_body(&node.body, modules);
            collect_body(&node.orelse, modules);
        }
        ast::Stmt::With(node) => collect_body(&node.body, modules),
        ast::Stmt::AsyncWith(node) => collect_body(&node.body, modules),
        ast::Stmt::Try(node) => {
            collect_body(&node.body, modules);
            collect_handlers(&node.handlers, modules);
            collect_body(&node.orelse, modules);
            collect_body(&node.finalbody, modules);
        }
        ast::Stmt::TryStar(node) => {
            collect_body(&node.body, modules);
            collect_handlers(&node.handlers, modules);
            collect_body(&node.orelse, modules);
            collect_body(&node.finalbody, modules);
        }
        ast::Stmt::Match(node) => {
            for case in &node.cases {
                collect_body(&case.body, modules);
            }
        }
        _ => {}
    }
}

fn collect_handlers(handlers: &[ast::ExceptHandler], modules: &mut ModuleSet) {
    for handler in handlers {
        match handler {
            ast::ExceptHandler::ExceptHandler(handler) => collect_body(&handler.body, modules),
        }
    }
}
