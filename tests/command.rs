use pretty_assertions::assert_eq;
use search_trees::command::{self, Command, ParseError};
use search_trees::{SearchTree, TreeKind};

const SCRIPT: &str = "\
add 50 500
add 20 200
add 80 800
add 20 210
search 20
search 99
min
max

delete 50
delete 50
search 50
add ten 10
max 3
print
";

#[test]
fn script_output_is_identical_for_both_kinds() {
    let mut outputs = Vec::new();
    for kind in [TreeKind::RedBlack, TreeKind::TwoThree] {
        let mut tree = kind.build::<i32, i32>();
        let mut out = String::new();
        let diagnostics = command::run_script(&mut *tree, SCRIPT, &mut out).unwrap();

        let rejected: Vec<(usize, &str)> = diagnostics
            .iter()
            .map(|diagnostic| (diagnostic.line, diagnostic.text.as_str()))
            .collect();
        assert_eq!(rejected, [(13, "add ten 10"), (14, "max 3")]);
        assert_eq!(tree.len(), 2);

        // Everything but the trailing `print` is shape independent.
        let (values, shape) = out.split_at(out.find("└──").unwrap());
        assert_eq!(values, "210\nNot found\n210\n800\nNot found\n");
        outputs.push(shape.to_string());
    }

    assert_eq!(outputs[0], "└── 20 B\n    └── 80 R\n");
    assert_eq!(outputs[1], "└── 20|80\n");
}

#[test]
fn execute_drives_a_tree_directly() {
    let mut tree = TreeKind::RedBlack.build::<u32, String>();
    let mut out = String::new();
    for line in ["add 7 seven", "search 7", "print", "delete 7", "min", "print"] {
        let command: Command<u32, String> = line.parse().unwrap();
        command.execute(&mut *tree, &mut out).unwrap();
    }
    assert_eq!(out, "seven\n└── 7 B\nNot found\nempty tree\n");
}

#[test]
fn commands_must_match_whole_words() {
    for line in ["adder 1 2", "minimum", "printer", "Search 4"] {
        let error = line.parse::<Command<i32, i32>>().unwrap_err();
        assert!(matches!(error, ParseError::UnknownCommand(_)), "{line}: {error}");
    }
}
