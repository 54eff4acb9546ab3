//! `quick-xml` adapter bridging a raw XCSP3 document into the
//! streaming driver's [`XmlEvents`] contract. §6 leaves the SAX-level
//! tokeniser "assumed available"; this is the concrete one, the same
//! role `quick_xml::Reader` plays for the XMLTV ingestor elsewhere in
//! this corpus.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use xcsp3_diagnostic::{ParseError, Result};
use xcsp3_ir::{Instance, InstanceType};
use xcsp3_parse::{Attribute, CallbackBank, Driver, ParserConfig, XmlEvents};

fn malformed(offset: usize, err: impl std::fmt::Display) -> ParseError {
    ParseError::MalformedXml { offset, message: err.to_string() }
}

fn decode<'a>(bytes: &'a [u8], offset: usize) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| malformed(offset, e))
}

fn tag_attributes<'a>(tag: &'a BytesStart<'a>, offset: usize) -> Result<Vec<Attribute<'a>>> {
    let mut attrs = Vec::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| malformed(offset, e))?;
        attrs.push(Attribute {
            name: decode(attr.key.as_ref(), offset)?,
            value: decode(attr.value.as_ref(), offset)?,
        });
    }
    Ok(attrs)
}

/// Peeks at the root `<instance>` tag's `type` attribute without
/// driving a full parse, so the caller doesn't need to know CSP vs.
/// COP ahead of time — the document itself is authoritative.
fn sniff_instance_type(xml: &str) -> InstanceType {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref tag)) | Ok(Event::Empty(ref tag)) if tag.name().as_ref() == b"instance" => {
                let is_cop = tag
                    .attributes()
                    .flatten()
                    .any(|a| a.key.as_ref() == b"type" && a.value.as_ref() == b"COP");
                return if is_cop { InstanceType::Cop } else { InstanceType::Csp };
            }
            Ok(Event::Eof) | Err(_) => return InstanceType::Csp,
            _ => {}
        }
    }
}

/// Parses a complete XCSP3 document, driving `bank` through every
/// event in document order and returning the finished [`Instance`].
pub fn parse_document(xml: &str, config: ParserConfig, bank: &mut dyn CallbackBank) -> Result<Instance> {
    let kind = sniff_instance_type(xml);
    let mut driver = Driver::new(kind, config, bank);

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        let offset = reader.buffer_position();
        match reader.read_event() {
            Ok(Event::Start(ref tag)) => {
                let name = decode(tag.name().as_ref(), offset)?;
                let attrs = tag_attributes(tag, offset)?;
                driver.start_element(name, &attrs)?;
            }
            Ok(Event::Empty(ref tag)) => {
                let name = decode(tag.name().as_ref(), offset)?;
                let attrs = tag_attributes(tag, offset)?;
                driver.start_element(name, &attrs)?;
                driver.end_element(name)?;
            }
            Ok(Event::End(ref tag)) => {
                let name = decode(tag.name().as_ref(), offset)?;
                driver.end_element(name)?;
            }
            Ok(Event::Text(e)) => {
                driver.characters(decode(&e, offset)?)?;
            }
            Ok(Event::CData(e)) => {
                driver.characters(decode(&e, offset)?)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(offset, e)),
        }
    }

    Ok(driver.into_instance())
}

/// Reads `path` from disk and parses it as an XCSP3 document.
pub fn parse_file(path: &std::path::Path, config: ParserConfig, bank: &mut dyn CallbackBank) -> Result<Instance> {
    let xml = std::fs::read_to_string(path).map_err(|e| ParseError::MalformedXml {
        offset: 0,
        message: format!("reading '{}': {e}", path.display()),
    })?;
    parse_document(&xml, config, bank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsp3_parse::CallbackBank;

    #[derive(Default)]
    struct CountingBank {
        variables: usize,
        constraints: usize,
    }

    impl CallbackBank for CountingBank {
        fn build_variable_integer_range(&mut self, _id: &str, _min: i64, _max: i64) {
            self.variables += 1;
        }
        fn build_variable_integer_enum(&mut self, _id: &str, _values: &[i64]) {
            self.variables += 1;
        }
        fn build_constraint_primitive_var_rel_const(&mut self, _id: &str, _op: xcsp3_ir::OrderType, _x: &str, _k: i64) {
            self.constraints += 1;
        }
    }

    const DOC: &str = r#"
        <instance type="CSP">
            <variables>
                <var id="x">0..3</var>
                <var id="y">0..3</var>
            </variables>
            <constraints>
                <intension id="c1">ge(x,1)</intension>
            </constraints>
        </instance>
    "#;

    #[test]
    fn parses_a_small_document_end_to_end() {
        let mut bank = CountingBank::default();
        let instance = parse_document(DOC, ParserConfig::default(), &mut bank).unwrap();
        assert_eq!(bank.variables, 2);
        assert_eq!(bank.constraints, 1);
        assert_eq!(instance.variables.len(), 2);
        assert_eq!(instance.constraints.len(), 1);
        assert_eq!(instance.kind, InstanceType::Csp);
    }

    #[test]
    fn sniffs_cop_instances() {
        let doc = DOC.replacen("CSP", "COP", 1);
        let mut bank = CountingBank::default();
        let instance = parse_document(&doc, ParserConfig::default(), &mut bank).unwrap();
        assert_eq!(instance.kind, InstanceType::Cop);
    }
}
