//! Character-data operations (component D): `setData`, `appendData`,
//! `insertData`, `deleteData`, `replaceData`, `substringData`,
//! `splitText`.

use crate::dispatch;
use crate::error::{DomException, ErrorName};
use crate::mutation;
use crate::node::{CharacterData, Node, NodeData, NodeRef};

fn get_data(node: &NodeRef) -> Result<String, DomException> {
    match &node.data {
        NodeData::Text(cd) | NodeData::CdataSection(cd) | NodeData::Comment(cd) => {
            Ok(cd.data.borrow().clone())
        }
        NodeData::ProcessingInstruction(pi) => Ok(pi.data.borrow().clone()),
        _ => Err(ErrorName::NoModificationAllowedError.into()),
    }
}

fn set_data_raw(node: &NodeRef, value: String) {
    match &node.data {
        NodeData::Text(cd) | NodeData::CdataSection(cd) | NodeData::Comment(cd) => {
            *cd.data.borrow_mut() = value;
        }
        NodeData::ProcessingInstruction(pi) => *pi.data.borrow_mut() = value,
        _ => unreachable!("checked by get_data"),
    }
}

pub fn set_data(node: &NodeRef, value: &str) -> Result<(), DomException> {
    let prev = get_data(node)?;
    set_data_raw(node, value.to_string());
    dispatch::fire_character_data_modified(node, &prev, value);
    Ok(())
}

pub fn append_data(node: &NodeRef, value: &str) -> Result<(), DomException> {
    let prev = get_data(node)?;
    let new_value = format!("{prev}{value}");
    set_data_raw(node, new_value.clone());
    dispatch::fire_character_data_modified(node, &prev, &new_value);
    Ok(())
}

pub fn insert_data(node: &NodeRef, offset: usize, value: &str) -> Result<(), DomException> {
    let prev = get_data(node)?;
    let chars: Vec<char> = prev.chars().collect();
    if offset > chars.len() {
        return Err(ErrorName::IndexSizeError.into());
    }
    let mut new_value: String = chars[..offset].iter().collect();
    new_value.push_str(value);
    new_value.extend(&chars[offset..]);
    set_data_raw(node, new_value.clone());
    dispatch::fire_character_data_modified(node, &prev, &new_value);
    Ok(())
}

pub fn delete_data(node: &NodeRef, offset: usize, count: usize) -> Result<(), DomException> {
    let prev = get_data(node)?;
    let chars: Vec<char> = prev.chars().collect();
    if offset > chars.len() {
        return Err(ErrorName::IndexSizeError.into());
    }
    let end = (offset + count).min(chars.len());
    let new_value: String = chars[..offset].iter().chain(chars[end..].iter()).collect();
    set_data_raw(node, new_value.clone());
    dispatch::fire_character_data_modified(node, &prev, &new_value);
    Ok(())
}

pub fn replace_data(node: &NodeRef, offset: usize, count: usize, value: &str) -> Result<(), DomException> {
    let prev = get_data(node)?;
    let chars: Vec<char> = prev.chars().collect();
    if offset > chars.len() {
        return Err(ErrorName::IndexSizeError.into());
    }
    let end = (offset + count).min(chars.len());
    let mut new_value: String = chars[..offset].iter().collect();
    new_value.push_str(value);
    new_value.extend(&chars[end..]);
    set_data_raw(node, new_value.clone());
    dispatch::fire_character_data_modified(node, &prev, &new_value);
    Ok(())
}

pub fn substring_data(node: &NodeRef, offset: usize, count: usize) -> Result<String, DomException> {
    let data = get_data(node)?;
    let chars: Vec<char> = data.chars().collect();
    if offset > chars.len() {
        return Err(ErrorName::IndexSizeError.into());
    }
    let end = (offset + count).min(chars.len());
    Ok(chars[offset..end].iter().collect())
}

/// Splits a text or CDATA node at `offset`: the original node retains
/// `[0, offset)`, and a new sibling of the same type is inserted
/// immediately afterward holding `[offset, end)`. Grounded on the
/// reference `CDATASection::splitText` implementation: builds the new
/// node from `substringData`, then shrinks the original with
/// `deleteData`, then inserts the new node via the ordinary tree API.
pub fn split_text(node: &NodeRef, offset: usize) -> Result<NodeRef, DomException> {
    let data = get_data(node)?;
    let len = data.chars().count();
    if offset > len {
        return Err(ErrorName::IndexSizeError.into());
    }

    let tail = substring_data(node, offset, len - offset)?;
    delete_data(node, offset, len - offset)?;

    let new_node = Node::new(match &node.data {
        NodeData::Text(_) => NodeData::Text(CharacterData::new(tail)),
        NodeData::CdataSection(_) => NodeData::CdataSection(CharacterData::new(tail)),
        _ => return Err(ErrorName::NoModificationAllowedError.into()),
    });
    *new_node.owner_document.borrow_mut() = node.owner_document.borrow().clone();

    if let Some(parent) = node.parent_node() {
        mutation::insert_before(&parent, &new_node, node.next_sibling().as_ref())?;
    }
    Ok(new_node)
}
