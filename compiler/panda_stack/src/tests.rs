use super::*;

/// A toy nested expression, shaped like a long member-access chain.
enum Chain {
    Leaf,
    Link(Box<Chain>),
}

fn build(depth: usize) -> Chain {
    let mut chain = Chain::Leaf;
    for _ in 0..depth {
        chain = Chain::Link(Box::new(chain));
    }
    chain
}

fn depth_of(chain: &Chain) -> usize {
    ensure_sufficient_stack(|| match chain {
        Chain::Leaf => 0,
        Chain::Link(inner) => depth_of(inner) + 1,
    })
}

#[test]
fn shallow_chain() {
    assert_eq!(depth_of(&build(3)), 3);
}

#[test]
fn deep_chain_does_not_overflow() {
    let chain = build(200_000);
    assert_eq!(depth_of(&chain), 200_000);
    // Dropping the chain iteratively; the derived drop would recurse.
    let mut cur = chain;
    while let Chain::Link(inner) = cur {
        cur = *inner;
    }
}

#[test]
fn forwards_result() {
    let result: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
    assert_eq!(result, Ok(7));
}
