//! Default HTML templates, used when the caller has no stored custom
//! template. Styling markup is embedded literally; the engine does not
//! escape values.

pub const DEFAULT_QUOTE_TEMPLATE: &str = r#"<html>
<head><style>
  body { font-family: sans-serif; }
  table { width: 100%; border-collapse: collapse; }
  td, th { padding: 6px; border-bottom: 1px solid #ddd; }
  .group-header td { font-weight: bold; background: #f5f5f5; }
</style></head>
<body>
  <h1>Quote {{document_number}}</h1>
  <p><strong>{{organization_name}}</strong><br>
  {{organization_address}}<br>
  {{organization_email}} {{organization_phone}}</p>
  <table>
    <tr><th></th><th>Item</th><th>Qty</th><th>Rate</th><th>{{tax_label}} %</th><th>Amount</th></tr>
    {{#each items}}
    {{#if (eq type "HEADER")}}
    <tr class="group-header"><td colspan="6">{{name}}</td></tr>
    {{else}}
    <tr>
      <td class="row-index">{{index}}</td>
      <td>{{name}}{{#if description}}<br><small>{{description}}</small>{{/if}}</td>
      <td>{{quantity}}</td>
      <td>{{currency_symbol}}{{rate}}</td>
      <td>{{tax_rate}}</td>
      <td>{{currency_symbol}}{{amount}}</td>
    </tr>
    {{/if}}
    {{/each}}
  </table>
  <p>Subtotal: {{currency_symbol}}{{subtotal}}<br>
  {{tax_label}}: {{currency_symbol}}{{tax_amount}}<br>
  <strong>Total: {{currency_symbol}}{{total}}</strong></p>
</body>
</html>
"#;

pub const DEFAULT_INVOICE_TEMPLATE: &str = r#"<html>
<head><style>
  body { font-family: sans-serif; }
  table { width: 100%; border-collapse: collapse; }
  td, th { padding: 6px; border-bottom: 1px solid #ddd; }
  .group-header td { font-weight: bold; background: #f5f5f5; }
  .stamp { color: #2e7d32; font-size: 24px; font-weight: bold; }
</style></head>
<body>
  <h1>Invoice {{document_number}}</h1>
  {{#if (eq status "paid")}}<div class="stamp">PAID</div>{{/if}}
  <p><strong>{{organization_name}}</strong><br>
  {{organization_address}}<br>
  {{organization_email}} {{organization_phone}}</p>
  {{#if due_date}}<p>Due: {{due_date}}</p>{{/if}}
  <table>
    <tr><th></th><th>Item</th><th>Qty</th><th>Rate</th><th>{{tax_label}} %</th><th>Amount</th></tr>
    {{#each items}}
    {{#if (eq type "HEADER")}}
    <tr class="group-header"><td colspan="6">{{name}}</td></tr>
    {{else}}
    <tr>
      <td class="row-index">{{index}}</td>
      <td>{{name}}{{#if description}}<br><small>{{description}}</small>{{/if}}</td>
      <td>{{quantity}}</td>
      <td>{{currency_symbol}}{{rate}}</td>
      <td>{{tax_rate}}</td>
      <td>{{currency_symbol}}{{amount}}</td>
    </tr>
    {{/if}}
    {{/each}}
  </table>
  <p>Subtotal: {{currency_symbol}}{{subtotal}}<br>
  {{tax_label}}: {{currency_symbol}}{{tax_amount}}<br>
  Paid: {{currency_symbol}}{{paid_amount}}<br>
  <strong>Balance due: {{currency_symbol}}{{balance_due}}</strong></p>
</body>
</html>
"#;
