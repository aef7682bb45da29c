//! Call-graph introspection tests

use std::sync::Arc;

use polyglot_engine::{
    find_calls_to, find_calls_to_in_caller, find_duplicate_call_targets, CallTarget, EngineError,
    Node, RootNode, Runtime,
};

fn unit(runtime: &Runtime, name: &str) -> Arc<CallTarget> {
    runtime.create_call_target(RootNode::new(name, 1, Node::add(Node::Argument(0), Node::Literal(1))))
}

// ===== Duplicates =====

mod duplicates {
    use super::*;

    #[test]
    fn test_unit_without_splits() {
        let runtime = Runtime::new();
        let inc = unit(&runtime, "inc");
        let found = find_duplicate_call_targets(&runtime, &inc);
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![inc]);
    }

    #[test]
    fn test_every_split_is_found() {
        let runtime = Runtime::new();
        let inc = unit(&runtime, "inc");
        let dec = unit(&runtime, "dec");
        let main = runtime.create_call_target(RootNode::new(
            "main",
            0,
            Node::Block(vec![
                Node::call(&inc, vec![Node::Literal(1)]),
                Node::call(&inc, vec![Node::Literal(2)]),
                Node::call(&dec, vec![Node::Literal(3)]),
            ]),
        ));

        main.root().accept(&mut |node: &Node| {
            if let Some(call) = node.as_direct_call() {
                call.clone_call_target(&runtime);
            }
            true
        });

        let found = find_duplicate_call_targets(&runtime, &inc);
        assert_eq!(found.len(), 3);
        assert!(found.contains(&inc));
        assert!(found.iter().filter(|t| **t != inc).all(|t| t.source_call_target() == Some(&inc)));
        assert_eq!(find_duplicate_call_targets(&runtime, &dec).len(), 2);
    }

    #[test]
    fn test_dropped_split_is_not_live() {
        let runtime = Runtime::new();
        let inc = unit(&runtime, "inc");
        {
            let call = Node::call(&inc, vec![Node::Literal(0)]);
            call.as_direct_call().unwrap().clone_call_target(&runtime);
            assert_eq!(find_duplicate_call_targets(&runtime, &inc).len(), 2);
        }
        assert_eq!(find_duplicate_call_targets(&runtime, &inc).len(), 1);
    }
}

// ===== Call sites =====

mod call_sites {
    use super::*;

    #[test]
    fn test_direct_and_cloned_targets_match() {
        let runtime = Runtime::new();
        let inc = unit(&runtime, "inc");
        let other = unit(&runtime, "other");
        let root = RootNode::new(
            "main",
            0,
            Node::Block(vec![
                Node::call(&inc, vec![Node::Literal(1)]),
                Node::call(&inc, vec![Node::Literal(2)]),
                Node::call(&other, vec![Node::Literal(3)]),
            ]),
        );
        let Node::Block(nodes) = root.body() else {
            panic!("expected block");
        };
        let plain = Arc::clone(nodes[0].as_direct_call().unwrap());
        let cloned_site = Arc::clone(nodes[1].as_direct_call().unwrap());
        let unrelated = Arc::clone(nodes[2].as_direct_call().unwrap());
        let split = cloned_site.clone_call_target(&runtime).unwrap();

        let to_inc = find_calls_to(&root, &inc);
        assert_eq!(to_inc.len(), 2);
        assert!(to_inc.contains(&plain));
        assert!(to_inc.contains(&cloned_site));
        assert!(!to_inc.contains(&unrelated));

        let to_split = find_calls_to(&root, &split);
        assert_eq!(to_split.into_iter().collect::<Vec<_>>(), vec![cloned_site]);
    }

    #[test]
    fn test_repeated_queries_agree() {
        let runtime = Runtime::new();
        let inc = unit(&runtime, "inc");
        let root = RootNode::new(
            "main",
            0,
            Node::add(
                Node::call(&inc, vec![Node::Literal(1)]),
                Node::Block(vec![Node::call(&inc, vec![Node::Literal(2)])]),
            ),
        );

        let first = find_calls_to(&root, &inc);
        let second = find_calls_to(&root, &inc);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_no_calls() {
        let runtime = Runtime::new();
        let inc = unit(&runtime, "inc");
        let root = RootNode::new("leaf", 0, Node::Literal(7));
        assert!(find_calls_to(&root, &inc).is_empty());
    }
}

// ===== Caller frame =====

mod caller {
    use super::*;
    use polyglot_engine::EngineResult;

    #[test]
    fn test_in_caller_searches_executing_root() {
        let runtime = Runtime::new();
        let inc = unit(&runtime, "inc");
        let inc_target = Arc::clone(&inc);
        let count_calls = Node::builtin(
            "count_calls_to_inc",
            vec![],
            Arc::new(move |rt: &Runtime, _args: &[i64]| -> EngineResult<i64> {
                Ok(find_calls_to_in_caller(rt, &inc_target)?.len() as i64)
            }),
        );
        let main = runtime.create_call_target(RootNode::new(
            "main",
            0,
            Node::Block(vec![
                Node::call(&inc, vec![Node::Literal(1)]),
                Node::call(&inc, vec![Node::Literal(2)]),
                count_calls,
            ]),
        ));

        assert_eq!(runtime.call(&main, &[]).unwrap(), 2);
    }

    #[test]
    fn test_outside_any_call() {
        let runtime = Runtime::new();
        let inc = unit(&runtime, "inc");
        assert!(matches!(
            find_calls_to_in_caller(&runtime, &inc),
            Err(EngineError::NoCurrentFrame)
        ));
    }
}
