use super::{read_block, Routine};
use crate::mapfile::error::{ErrorKind, Result};
use crate::mapfile::lexer::Keyword;
use crate::mapfile::model::{Join, JoinConnection, JoinType, Symbolic};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

const ROUTINE: Routine = ("parse_join", "update_join");

/// `JOIN ... END`. Table, from and to are required; a one-to-many join also
/// needs a template and a name.
pub fn parse_join(ctx: &mut ParserContext<'_>) -> Result<Join> {
    let routine = ctx.routine(ROUTINE);
    let mut join = Join::default();
    read_block(ctx, routine, |ctx, keyword| apply_join_field(ctx, &mut join, keyword))?;

    if join.table.is_none() || join.from.is_none() || join.to.is_none() {
        return Err(ctx.fail(
            ErrorKind::Misc,
            routine,
            "Join must define table, name, from and to properties.",
        ));
    }
    if join.join_type == JoinType::OneToMany && (join.template.is_none() || join.name.is_none()) {
        return Err(ctx.fail(
            ErrorKind::Misc,
            routine,
            "One-to-many joins must define template and name properties.",
        ));
    }
    Ok(join)
}

pub fn apply_join_field(ctx: &mut ParserContext<'_>, join: &mut Join, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(ROUTINE);
    let slot = match keyword {
        Keyword::Connection => &mut join.connection,
        Keyword::Footer => &mut join.footer,
        Keyword::From => &mut join.from,
        Keyword::Header => &mut join.header,
        Keyword::Name => &mut join.name,
        Keyword::Table => &mut join.table,
        Keyword::Template => &mut join.template,
        Keyword::To => &mut join.to,
        Keyword::ConnectionType => {
            join.connection_type = ctx.read_choice(routine, JoinConnection::ALL)?;
            return Ok(FieldOutcome::Applied);
        }
        Keyword::Type => {
            join.join_type = ctx.read_choice(routine, JoinType::ALL)?;
            return Ok(FieldOutcome::Applied);
        }
        _ => return Ok(FieldOutcome::Unknown),
    };
    *slot = Some(ctx.read_text(routine)?);
    Ok(FieldOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapfile::parser::context::ParserOptions;

    fn parse(text: &str) -> Result<Join> {
        let mut ctx = ParserContext::document(text, ParserOptions::default());
        parse_join(&mut ctx)
    }

    #[test]
    fn test_join_fields() {
        let join = parse(
            "NAME 'owners' TABLE 'owners.dbf' FROM 'ID' TO 'OWNER_ID' \
             TYPE ONE-TO-MANY TEMPLATE 'owner.html' CONNECTIONTYPE CSV END",
        )
        .unwrap();
        assert_eq!(join.table.as_deref(), Some("owners.dbf"));
        assert_eq!(join.join_type, JoinType::OneToMany);
        assert_eq!(join.connection_type, JoinConnection::Csv);
    }

    #[test]
    fn test_join_requires_table_from_to() {
        let err = parse("TABLE 'owners.dbf' FROM 'ID' END").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Misc);
        assert!(err.message.contains("table, name, from and to"));
    }

    #[test]
    fn test_one_to_many_requires_template_and_name() {
        let err = parse("TABLE 't' FROM 'a' TO 'b' TYPE ONE-TO-MANY END").unwrap_err();
        assert!(err.message.contains("One-to-many"));
    }
}
